//! Catalog browsing.
//!
//! Thin pass-through over the `products` collection. Category filters
//! and ordering run in the store; text search and stock refinement run
//! in memory over the (bounded) result page, the backend's query surface
//! being equality-only.

use serde::Deserialize;

use pampa_core::catalog::Product;
use pampa_core::store::{DocumentStore, Query, StoreError, Stored, collections};
use pampa_core::types::ProductId;

/// Listing cap; the catalog is small, pagination is not worth carrying.
const LISTING_LIMIT: usize = 100;

/// Default number of featured / similar products returned.
const SHELF_LIMIT: usize = 4;

/// How a product listing is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category filter; `all` (or absent) disables it.
    pub category: Option<String>,
    /// Case-insensitive substring match over name and description.
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

fn decode_products(raw: Vec<Stored<serde_json::Value>>) -> Vec<Stored<Product>> {
    raw.into_iter()
        .filter_map(|stored| match stored.decode::<Product>() {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!("skipping malformed product document: {e}");
                None
            }
        })
        .collect()
}

/// List products with optional category, search and sort.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend query fails.
pub async fn list_products(
    store: &dyn DocumentStore,
    params: &ProductQuery,
) -> Result<Vec<Stored<Product>>, StoreError> {
    let mut query = Query::new().limit(LISTING_LIMIT);

    if let Some(category) = params
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all")
    {
        query = query.filter("category", category);
    }

    query = match params.sort {
        SortKey::Newest => query.order_by_desc("created_at"),
        SortKey::PriceAsc => query.order_by_asc("price"),
        SortKey::PriceDesc => query.order_by_desc("price"),
    };

    let mut products = decode_products(store.query(collections::PRODUCTS, query).await?);

    if let Some(needle) = params
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty())
    {
        products.retain(|p| {
            p.doc.name.to_lowercase().contains(&needle)
                || p.doc.description.to_lowercase().contains(&needle)
        });
    }

    // Prices serialize as strings, so the store's lexicographic order is
    // not numeric; re-sort the page by actual price.
    match params.sort {
        SortKey::Newest => {}
        SortKey::PriceAsc => products.sort_by(|a, b| a.doc.price.cmp(&b.doc.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.doc.price.cmp(&a.doc.price)),
    }

    Ok(products)
}

/// Fetch one product by id; `None` when absent or malformed.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend read fails.
pub async fn get_product(
    store: &dyn DocumentStore,
    id: &ProductId,
) -> Result<Option<Stored<Product>>, StoreError> {
    let Some(doc) = store.get(collections::PRODUCTS, id.as_str()).await? else {
        return Ok(None);
    };
    let stored = Stored {
        id: id.as_str().to_owned(),
        doc,
    };
    Ok(stored.decode::<Product>().ok())
}

/// Featured products for the home page, newest first.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend query fails.
pub async fn featured_products(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> Result<Vec<Stored<Product>>, StoreError> {
    let query = Query::new()
        .filter("featured", true)
        .order_by_desc("created_at")
        .limit(limit.unwrap_or(SHELF_LIMIT));
    Ok(decode_products(
        store.query(collections::PRODUCTS, query).await?,
    ))
}

/// Products of the same category that are in stock, excluding the
/// product itself.
///
/// # Errors
///
/// Returns [`StoreError`] if the backend query fails.
pub async fn similar_products(
    store: &dyn DocumentStore,
    category: &str,
    exclude: &ProductId,
    limit: Option<usize>,
) -> Result<Vec<Stored<Product>>, StoreError> {
    let limit = limit.unwrap_or(SHELF_LIMIT);
    // Over-fetch by one so excluding the product still fills the shelf
    let query = Query::new()
        .filter("category", category)
        .limit(limit.saturating_add(1));
    let mut products = decode_products(store.query(collections::PRODUCTS, query).await?);
    products.retain(|p| p.id != exclude.as_str() && p.doc.in_stock());
    products.truncate(limit);
    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pampa_backend::MemoryStore;
    use rust_decimal_macros::dec;

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, name, category, price, stock, featured, day) in [
            ("p1", "Termo Stanley Classic 1L", "termos", dec!(89.99), 15, true, 10),
            ("p2", "Drone DJI Mini 3 Pro", "drones", dec!(899.99), 5, true, 12),
            ("p3", "Termo Hydro Flask 1.2L", "termos", dec!(49.99), 0, false, 14),
            ("p4", "Auriculares Sony WH-1000XM4", "tecnologia", dec!(299.99), 6, false, 16),
        ] {
            let created = Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap();
            let product = Product {
                name: name.to_owned(),
                description: format!("Descripción de {name}"),
                category: category.to_owned(),
                price,
                stock,
                weight_kg: dec!(1),
                featured,
                image_url: None,
                created_at: created,
                updated_at: created,
            };
            store
                .upsert(
                    collections::PRODUCTS,
                    id,
                    serde_json::to_value(&product).unwrap(),
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = seeded_store().await;
        let products = list_products(&store, &ProductQuery::default()).await.unwrap();
        assert_eq!(products.len(), 4);
        assert_eq!(products[0].id, "p4");
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let store = seeded_store().await;
        let params = ProductQuery {
            category: Some("termos".to_owned()),
            ..Default::default()
        };
        let products = list_products(&store, &params).await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.doc.category == "termos"));
    }

    #[tokio::test]
    async fn test_category_all_is_no_filter() {
        let store = seeded_store().await;
        let params = ProductQuery {
            category: Some("all".to_owned()),
            ..Default::default()
        };
        assert_eq!(list_products(&store, &params).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_search_matches_name_and_description() {
        let store = seeded_store().await;
        let params = ProductQuery {
            search: Some("stanley".to_owned()),
            ..Default::default()
        };
        let products = list_products(&store, &params).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "p1");
    }

    #[tokio::test]
    async fn test_sort_by_price() {
        let store = seeded_store().await;
        let params = ProductQuery {
            sort: SortKey::PriceAsc,
            ..Default::default()
        };
        let products = list_products(&store, &params).await.unwrap();
        let prices: Vec<_> = products.iter().map(|p| p.doc.price).collect();
        assert_eq!(prices, vec![dec!(49.99), dec!(89.99), dec!(299.99), dec!(899.99)]);
    }

    #[tokio::test]
    async fn test_featured_shelf() {
        let store = seeded_store().await;
        let products = featured_products(&store, None).await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.doc.featured));
        // Newest first
        assert_eq!(products[0].id, "p2");
    }

    #[tokio::test]
    async fn test_similar_excludes_self_and_out_of_stock() {
        let store = seeded_store().await;
        let products = similar_products(&store, "termos", &ProductId::new("p1"), None)
            .await
            .unwrap();
        // p3 is the only other termo but it is out of stock
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_get_product() {
        let store = seeded_store().await;
        let product = get_product(&store, &ProductId::new("p2")).await.unwrap();
        assert_eq!(product.unwrap().doc.name, "Drone DJI Mini 3 Pro");

        let missing = get_product(&store, &ProductId::new("nope")).await.unwrap();
        assert!(missing.is_none());
    }
}
