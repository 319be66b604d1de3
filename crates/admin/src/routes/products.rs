//! Product management route handlers.
//!
//! Direct pass-through to the `products` collection, with timestamps
//! stamped server-side.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use pampa_core::catalog::Product;
use pampa_core::store::{DocumentStore, Query, Stored, collections};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Product create/update form.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub weight_kg: Option<Decimal>,
    #[serde(default)]
    pub featured: bool,
    pub image_url: Option<String>,
}

impl ProductForm {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("el nombre es obligatorio".to_owned()));
        }
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest(
                "el precio no puede ser negativo".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Full catalog listing, newest first.
#[instrument(skip(state))]
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<Product>>>> {
    let raw = state
        .store()
        .query(
            collections::PRODUCTS,
            Query::new().order_by_desc("created_at"),
        )
        .await?;

    let products = raw
        .into_iter()
        .filter_map(|stored| match stored.decode::<Product>() {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!("skipping malformed product document: {e}");
                None
            }
        })
        .collect();
    Ok(Json(products))
}

/// Create a product.
#[instrument(skip(state, form))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Value>> {
    form.validate()?;

    let now = Utc::now();
    let product = Product {
        name: form.name,
        description: form.description,
        category: form.category,
        price: form.price,
        stock: form.stock,
        weight_kg: form.weight_kg.unwrap_or(Decimal::ONE),
        featured: form.featured,
        image_url: form.image_url,
        created_at: now,
        updated_at: now,
    };

    let doc = serde_json::to_value(&product).map_err(|e| AppError::Internal(e.to_string()))?;
    let id = state.store().insert(collections::PRODUCTS, doc).await?;

    tracing::info!(product_id = %id, admin = %admin.id, "product created");
    Ok(Json(json!({ "id": id })))
}

/// Update a product; timestamps refresh, creation time survives.
#[instrument(skip(state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Value>> {
    form.validate()?;

    let mut patch = json!({
        "name": form.name,
        "description": form.description,
        "category": form.category,
        "price": form.price,
        "stock": form.stock,
        "featured": form.featured,
        "updated_at": Utc::now(),
    });

    // Optional fields are merged only when present so a partial form
    // does not blank them out
    if let Value::Object(map) = &mut patch {
        if let Some(weight) = form.weight_kg {
            map.insert("weight_kg".to_owned(), json!(weight));
        }
        if let Some(image_url) = form.image_url {
            map.insert("image_url".to_owned(), Value::String(image_url));
        }
    }

    state
        .store()
        .update(collections::PRODUCTS, &id, patch)
        .await?;

    tracing::info!(product_id = %id, admin = %admin.id, "product updated");
    Ok(Json(json!({ "id": id })))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.store().delete(collections::PRODUCTS, &id).await?;
    tracing::info!(product_id = %id, admin = %admin.id, "product deleted");
    Ok(Json(json!({ "ok": true })))
}
