//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query as UrlQuery, State},
};
use serde::Deserialize;
use tracing::instrument;

use pampa_core::catalog::Product;
use pampa_core::store::Stored;
use pampa_core::types::ProductId;

use crate::error::{AppError, Result};
use crate::services::catalog::{self, ProductQuery};
use crate::state::AppState;

/// Query string for shelf endpoints.
#[derive(Debug, Deserialize)]
pub struct ShelfParams {
    pub limit: Option<usize>,
}

/// Product listing with optional category, search and sort.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<ProductQuery>,
) -> Result<Json<Vec<Stored<Product>>>> {
    let products = catalog::list_products(state.store().as_ref(), &params).await?;
    Ok(Json(products))
}

/// Product detail; 404 when the id is unknown.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Product>>> {
    let product = catalog::get_product(state.store().as_ref(), &ProductId::new(&id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;
    Ok(Json(product))
}

/// Same-category in-stock products for the detail page shelf.
#[instrument(skip(state))]
pub async fn similar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    UrlQuery(params): UrlQuery<ShelfParams>,
) -> Result<Json<Vec<Stored<Product>>>> {
    let product_id = ProductId::new(&id);
    let product = catalog::get_product(state.store().as_ref(), &product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;

    let products = catalog::similar_products(
        state.store().as_ref(),
        &product.doc.category,
        &product_id,
        params.limit,
    )
    .await?;
    Ok(Json(products))
}

/// Featured products for the home page.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<ShelfParams>,
) -> Result<Json<Vec<Stored<Product>>>> {
    let products = catalog::featured_products(state.store().as_ref(), params.limit).await?;
    Ok(Json(products))
}
