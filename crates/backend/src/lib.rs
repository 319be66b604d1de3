//! Pampa Backend - document store and auth provider implementations.
//!
//! The rest of the workspace only speaks the capability traits from
//! `pampa-core::store`; this crate supplies the concrete backends:
//!
//! - [`MemoryStore`] - in-process store for tests, development and CLI
//!   dry runs.
//! - [`PgDocumentStore`] - self-hosted `PostgreSQL` backend keeping each
//!   document as a JSONB row.
//! - [`StoreAuthProvider`] - credential documents in the store with
//!   argon2 password hashing.
//!
//! # Backend selection
//!
//! Services and the CLI pick a backend from the `PAMPA_BACKEND`
//! environment variable (`memory` or `postgres`) via [`store_from_env`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use secrecy::SecretString;

use pampa_core::store::DocumentStore;

pub use auth::StoreAuthProvider;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Errors from backend construction.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("unknown backend kind: {0} (expected \"memory\" or \"postgres\")")]
    UnknownKind(String),
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Build a document store from environment configuration.
///
/// Reads `PAMPA_BACKEND` (default `memory`); the `postgres` backend
/// additionally needs `PAMPA_DATABASE_URL` (or the generic
/// `DATABASE_URL`).
///
/// # Errors
///
/// Returns [`BackendError`] when the kind is unknown, the database URL
/// is missing, or the connection cannot be established.
pub async fn store_from_env() -> Result<Arc<dyn DocumentStore>, BackendError> {
    let kind = std::env::var("PAMPA_BACKEND").unwrap_or_else(|_| "memory".to_owned());
    match kind.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "postgres" => {
            let url = database_url_from_env()?;
            let pool = postgres::create_pool(&url).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        other => Err(BackendError::UnknownKind(other.to_owned())),
    }
}

/// Database URL with fallback to generic `DATABASE_URL` (set by managed
/// Postgres attach).
///
/// # Errors
///
/// Returns [`BackendError::MissingEnvVar`] when neither variable is set.
pub fn database_url_from_env() -> Result<SecretString, BackendError> {
    if let Ok(value) = std::env::var("PAMPA_DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(BackendError::MissingEnvVar("PAMPA_DATABASE_URL".to_owned()))
}
