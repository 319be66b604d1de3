//! Storage and authentication capability traits.
//!
//! Persistence is delegated to a managed document backend; this module
//! defines the narrow surface the rest of the workspace is allowed to
//! use, so the concrete backend stays swappable:
//!
//! - [`DocumentStore`] - create/read/update/delete JSON documents by
//!   collection and id, plus equality-filtered, sorted, limited queries.
//! - [`AuthProvider`] - credential-based registration and sign-in.
//!
//! Implementations live in `pampa-backend`; nothing in `pampa-core`
//! performs I/O.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::types::{Email, UserId};

/// Collection names used across the workspace.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const USERS: &str = "users";
    pub const CREDENTIALS: &str = "credentials";
    pub const SHIPPING_ZONES: &str = "shipping_zones";
    pub const PAYMENT_METHODS: &str = "payment_methods";
}

/// A raw document: a JSON object as the backend stores it.
pub type Document = serde_json::Value;

/// A document together with its backend-assigned id.
///
/// Serializes flat (`{"id": ..., ...fields}`), the shape the JSON APIs
/// return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: String,
    #[serde(flatten)]
    pub doc: T,
}

impl Stored<Document> {
    /// Decode the raw document into a typed one, keeping the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] when the document does not match
    /// the expected shape.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Stored<T>, StoreError> {
        let doc = serde_json::from_value(self.doc)
            .map_err(|e| StoreError::Corrupt(format!("document {}: {e}", self.id)))?;
        Ok(Stored { id: self.id, doc })
    }
}

/// Sort direction for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A query over one collection: equality filters on top-level fields,
/// an optional sort field and a limit.
///
/// Deliberately minimal - it covers what the storefront and admin
/// actually ask of the backend (category/status/user filters, newest- or
/// price-ordered listings). Range predicates are refined in memory by
/// the service layer.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<(String, serde_json::Value)>,
    pub order_by: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only documents whose `field` equals `value`.
    #[must_use]
    pub fn filter(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.filters.push((field.to_owned(), value.into()));
        self
    }

    /// Sort ascending by a top-level field.
    #[must_use]
    pub fn order_by_asc(mut self, field: &str) -> Self {
        self.order_by = Some((field.to_owned(), SortOrder::Asc));
        self
    }

    /// Sort descending by a top-level field.
    #[must_use]
    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by = Some((field.to_owned(), SortOrder::Desc));
        self
    }

    /// Cap the number of returned documents.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Errors surfaced by a document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with that id in the collection.
    #[error("not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A stored document no longer matches its expected shape.
    #[error("corrupt document: {0}")]
    Corrupt(String),

    /// The backend itself failed (connection, query, transaction).
    #[error("backend error: {0}")]
    Backend(String),
}

/// The document-database capability surface.
///
/// Documents are JSON objects; ids are opaque strings assigned by the
/// backend on [`insert`](DocumentStore::insert) or chosen by the caller
/// on [`upsert`](DocumentStore::upsert) (used for well-known ids like
/// zone and payment-method documents).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document, returning its assigned id.
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Create or fully replace the document at `id`.
    async fn upsert(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Fetch a document by id; `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge `patch`'s top-level fields into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document is absent.
    async fn update(&self, collection: &str, id: &str, patch: Document)
    -> Result<(), StoreError>;

    /// Delete a document by id. Deleting an absent document is an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Run a [`Query`] against a collection.
    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<Stored<Document>>, StoreError>;
}

/// A signed-in (or newly registered) identity as reported by the auth
/// provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
}

/// Errors from the authentication provider.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for that email.
    #[error("user not found")]
    UserNotFound,

    /// Registration with an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password rejected at registration.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The provider itself failed.
    #[error("auth provider error: {0}")]
    Provider(String),
}

/// Credential-based session issuance, the capability surface of the
/// managed auth product.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account and return the signed-in identity.
    async fn register(
        &self,
        email: &Email,
        password: &str,
        display_name: &str,
    ) -> Result<AuthUser, AuthError>;

    /// Verify credentials and return the signed-in identity.
    async fn login(&self, email: &Email, password: &str) -> Result<AuthUser, AuthError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let q = Query::new()
            .filter("status", "pending")
            .order_by_desc("created_at")
            .limit(10);
        assert_eq!(q.filters.len(), 1);
        assert_eq!(q.order_by, Some(("created_at".to_owned(), SortOrder::Desc)));
        assert_eq!(q.limit, Some(10));
    }

    #[test]
    fn test_stored_serializes_flat() {
        let stored = Stored {
            id: "p1".to_owned(),
            doc: serde_json::json!({"name": "Termo", "price": "89.99"}),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["name"], "Termo");
    }

    #[test]
    fn test_stored_decode_rejects_wrong_shape() {
        #[derive(Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let ok = Stored {
            id: "x".to_owned(),
            doc: serde_json::json!({"name": "Mate"}),
        };
        assert!(ok.decode::<Named>().is_ok());

        let bad = Stored {
            id: "y".to_owned(),
            doc: serde_json::json!({"precio": 10}),
        };
        assert!(matches!(
            bad.decode::<Named>(),
            Err(StoreError::Corrupt(_))
        ));
    }
}
