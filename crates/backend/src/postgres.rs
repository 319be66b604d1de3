//! `PostgreSQL` document store.
//!
//! A self-hosted stand-in for the managed document backend: every
//! document is one JSONB row in a single `documents` table, keyed by
//! `(collection, id)`. Queries are built at runtime because documents
//! are schemaless; equality filters compile to JSONB containment
//! (`data @> {...}`) served by a GIN index.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use pampa_core::store::{Document, DocumentStore, Query, SortOrder, StoreError, Stored};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the `documents` table migrations.
///
/// The services never migrate on startup; the CLI runs this explicitly
/// via `pampa-cli migrate`.
///
/// # Errors
///
/// Returns a `MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// A [`DocumentStore`] over a single JSONB table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for health checks.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn backend_err(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.upsert(collection, &id, doc).await?;
        Ok(id)
    }

    async fn upsert(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(&doc)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT data FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend_err)?;

        row.map(|r| r.try_get::<Document, _>("data").map_err(backend_err))
            .transpose()
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE documents
            SET data = data || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(&patch)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(backend_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<Stored<Document>>, StoreError> {
        let mut builder = QueryBuilder::new("SELECT id, data FROM documents WHERE collection = ");
        builder.push_bind(collection);

        for (field, value) in &query.filters {
            // Scalar equality as JSONB containment, served by the GIN index
            builder.push(" AND data @> ");
            builder.push_bind(serde_json::json!({ field.as_str(): value }));
        }

        if let Some((field, order)) = &query.order_by {
            builder.push(" ORDER BY data->>");
            builder.push_bind(field.as_str());
            builder.push(match order {
                SortOrder::Asc => " ASC",
                SortOrder::Desc => " DESC",
            });
        } else {
            // Deterministic order matching the in-memory backend
            builder.push(" ORDER BY id ASC");
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(backend_err)?;

        rows.into_iter()
            .map(|row| {
                Ok(Stored {
                    id: row.try_get("id").map_err(backend_err)?,
                    doc: row.try_get("data").map_err(backend_err)?,
                })
            })
            .collect()
    }
}
