//! In-memory document store.
//!
//! Backs tests, local development and CLI dry runs. Collections are
//! plain maps behind an `RwLock`; queries are evaluated in memory with
//! the same filter/sort/limit semantics the Postgres backend provides.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use pampa_core::store::{Document, DocumentStore, Query, SortOrder, StoreError, Stored};

/// An in-process [`DocumentStore`].
///
/// `BTreeMap` keeps per-collection iteration deterministic (by id), so
/// unsorted queries have a stable order across runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, BTreeMap<String, Value>>>, StoreError>
    {
        self.collections
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_owned()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, BTreeMap<String, Value>>>, StoreError>
    {
        self.collections
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_owned()))
    }
}

/// Ordering over JSON field values: nulls first, then booleans, numbers,
/// strings. RFC 3339 timestamps are strings, so chronological sorting
/// falls out of lexicographic comparison.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        // Mixed/structured values have no meaningful order
        _ => Ordering::Equal,
    }
}

fn matches_filters(doc: &Value, query: &Query) -> bool {
    query
        .filters
        .iter()
        .all(|(field, expected)| doc.get(field) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        self.write()?
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn upsert(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        self.write()?
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), doc);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
    ) -> Result<(), StoreError> {
        let mut collections = self.write()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })?;

        if let (Value::Object(target), Value::Object(fields)) = (doc, patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
            Ok(())
        } else {
            Err(StoreError::Corrupt(format!(
                "merge requires objects: {collection}/{id}"
            )))
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write()?
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })
    }

    async fn query(
        &self,
        collection: &str,
        query: Query,
    ) -> Result<Vec<Stored<Document>>, StoreError> {
        let collections = self.read()?;
        let mut results: Vec<Stored<Document>> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| matches_filters(doc, &query))
                    .map(|(id, doc)| Stored {
                        id: id.clone(),
                        doc: doc.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, order)) = &query.order_by {
            results.sort_by(|a, b| {
                let cmp = compare_values(
                    a.doc.get(field).unwrap_or(&Value::Null),
                    b.doc.get(field).unwrap_or(&Value::Null),
                );
                match order {
                    SortOrder::Asc => cmp,
                    SortOrder::Desc => cmp.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        Ok(results)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert("products", json!({"name": "a"})).await.unwrap();
        let b = store.insert("products", json!({"name": "b"})).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(
            store.get("products", &a).await.unwrap().unwrap()["name"],
            "a"
        );
    }

    #[tokio::test]
    async fn test_upsert_replaces_document() {
        let store = MemoryStore::new();
        store
            .upsert("zones", "caba", json!({"base_cost": "500"}))
            .await
            .unwrap();
        store
            .upsert("zones", "caba", json!({"base_cost": "600"}))
            .await
            .unwrap();
        let doc = store.get("zones", "caba").await.unwrap().unwrap();
        assert_eq!(doc["base_cost"], "600");
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .upsert(
                "orders",
                "o1",
                json!({"status": "pending", "total": "550"}),
            )
            .await
            .unwrap();
        store
            .update(
                "orders",
                "o1",
                json!({"status": "shipped", "tracking_number": "AR123"}),
            )
            .await
            .unwrap();

        let doc = store.get("orders", "o1").await.unwrap().unwrap();
        assert_eq!(doc["status"], "shipped");
        assert_eq!(doc["tracking_number"], "AR123");
        // Untouched fields survive the merge
        assert_eq!(doc["total"], "550");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("orders", "nope", json!({"status": "shipped"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.upsert("products", "p1", json!({})).await.unwrap();
        store.delete("products", "p1").await.unwrap();
        assert!(store.get("products", "p1").await.unwrap().is_none());
        assert!(matches!(
            store.delete("products", "p1").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_filter_sort_limit() {
        let store = MemoryStore::new();
        for (id, category, price) in [
            ("p1", "termos", 90),
            ("p2", "drones", 900),
            ("p3", "termos", 50),
            ("p4", "termos", 120),
        ] {
            store
                .upsert("products", id, json!({"category": category, "price": price}))
                .await
                .unwrap();
        }

        let results = store
            .query(
                "products",
                Query::new()
                    .filter("category", "termos")
                    .order_by_asc("price")
                    .limit(2),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["p3", "p1"]);
    }

    #[tokio::test]
    async fn test_query_sorts_rfc3339_strings_chronologically() {
        let store = MemoryStore::new();
        store
            .upsert("orders", "old", json!({"created_at": "2026-01-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .upsert("orders", "new", json!({"created_at": "2026-02-01T00:00:00Z"}))
            .await
            .unwrap();

        let results = store
            .query("orders", Query::new().order_by_desc("created_at"))
            .await
            .unwrap();
        assert_eq!(results[0].id, "new");
    }

    #[tokio::test]
    async fn test_query_empty_collection() {
        let store = MemoryStore::new();
        let results = store.query("nothing", Query::new()).await.unwrap();
        assert!(results.is_empty());
    }
}
