//! Credential-based auth provider backed by the document store.
//!
//! Credentials live in their own collection keyed by normalized email
//! (`{user_id, password_hash}`); the customer profile is a separate
//! `users` document created at registration. Passwords are hashed with
//! argon2.

use std::sync::Arc;

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pampa_core::profile::UserProfile;
use pampa_core::store::{AuthError, AuthProvider, AuthUser, DocumentStore, StoreError, collections};
use pampa_core::types::{Email, UserId};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Credential document stored under the normalized email.
#[derive(Debug, Serialize, Deserialize)]
struct Credential {
    user_id: UserId,
    password_hash: String,
}

/// An [`AuthProvider`] that keeps credentials in the document store.
pub struct StoreAuthProvider {
    store: Arc<dyn DocumentStore>,
}

impl StoreAuthProvider {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn load_credential(&self, email: &Email) -> Result<Option<Credential>, AuthError> {
        let doc = self
            .store
            .get(collections::CREDENTIALS, &email.normalized())
            .await
            .map_err(store_err)?;
        doc.map(|d| {
            serde_json::from_value(d).map_err(|e| AuthError::Provider(format!("credential: {e}")))
        })
        .transpose()
    }
}

fn store_err(e: StoreError) -> AuthError {
    AuthError::Provider(e.to_string())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "la contraseña debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Provider("password hashing failed".to_owned()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|_| AuthError::Provider("stored hash is malformed".to_owned()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl AuthProvider for StoreAuthProvider {
    #[instrument(skip(self, password))]
    async fn register(
        &self,
        email: &Email,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError> {
        validate_password(password)?;

        if self.load_credential(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let profile = UserProfile::new(email.clone(), display_name, Utc::now());
        let profile_doc =
            serde_json::to_value(&profile).map_err(|e| AuthError::Provider(e.to_string()))?;
        let user_id = self
            .store
            .insert(collections::USERS, profile_doc)
            .await
            .map_err(store_err)?;

        let credential = Credential {
            user_id: UserId::new(user_id),
            password_hash: hash_password(password)?,
        };
        let credential_doc =
            serde_json::to_value(&credential).map_err(|e| AuthError::Provider(e.to_string()))?;
        self.store
            .upsert(collections::CREDENTIALS, &email.normalized(), credential_doc)
            .await
            .map_err(store_err)?;

        tracing::info!(user_id = %credential.user_id, "user registered");

        Ok(AuthUser {
            id: credential.user_id,
            email: email.clone(),
            display_name: display_name.to_owned(),
        })
    }

    #[instrument(skip(self, password))]
    async fn login(&self, email: &Email, password: &str) -> Result<AuthUser, AuthError> {
        let credential = self
            .load_credential(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(password, &credential.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self
            .store
            .get(collections::USERS, credential.user_id.as_str())
            .await
            .map_err(store_err)?
            .ok_or_else(|| AuthError::Provider("credential without profile".to_owned()))?;
        let profile: UserProfile = serde_json::from_value(profile)
            .map_err(|e| AuthError::Provider(format!("profile: {e}")))?;

        Ok(AuthUser {
            id: credential.user_id,
            email: profile.email,
            display_name: profile.display_name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn provider() -> StoreAuthProvider {
        StoreAuthProvider::new(Arc::new(MemoryStore::new()))
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = provider();
        let registered = auth
            .register(&email("ana@example.com"), "secreta123", "Ana")
            .await
            .unwrap();

        let logged_in = auth
            .login(&email("ana@example.com"), "secreta123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, registered.id);
        assert_eq!(logged_in.display_name, "Ana");
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let auth = provider();
        auth.register(&email("Ana@Example.com"), "secreta123", "Ana")
            .await
            .unwrap();
        assert!(
            auth.login(&email("ana@example.com"), "secreta123")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let auth = provider();
        auth.register(&email("ana@example.com"), "secreta123", "Ana")
            .await
            .unwrap();
        let err = auth
            .register(&email("ana@example.com"), "otraclave99", "Ana")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let auth = provider();
        auth.register(&email("ana@example.com"), "secreta123", "Ana")
            .await
            .unwrap();
        let err = auth
            .login(&email("ana@example.com"), "incorrecta")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let auth = provider();
        let err = auth
            .login(&email("nadie@example.com"), "loquesea1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let auth = provider();
        let err = auth
            .register(&email("ana@example.com"), "corta", "Ana")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }
}
