//! Product CRUD handlers. Each one makes exactly one store call and maps the
//! outcome onto a response; success is always `200 OK`.

use crate::dtos::{MessageResponse, PRODUCT_DELETED};
use crate::error::ProductError;
use crate::models::{Product, ProductFields};
use crate::services::StoreOutcome;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

/// JSON object body; anything else is rejected with `400` before the store is touched.
pub type ProductBody = WithRejection<Json<ProductFields>, ProductError>;

#[tracing::instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ProductError> {
    let products = state.store.list_all().await?;
    Ok(Json(products))
}

#[tracing::instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ProductError> {
    found(state.store.get_by_id(&id).await).map(Json)
}

#[tracing::instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    body: ProductBody,
) -> Result<Json<Product>, ProductError> {
    let WithRejection(Json(fields), _) = body;
    let product = state.store.create(fields).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok(Json(product))
}

#[tracing::instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: ProductBody,
) -> Result<Json<Product>, ProductError> {
    let WithRejection(Json(fields), _) = body;
    found(state.store.update_by_id(&id, fields).await).map(Json)
}

#[tracing::instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ProductError> {
    found(state.store.delete_by_id(&id).await)?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new(PRODUCT_DELETED)))
}

/// Maps a single-record outcome: missing records become `404`, store failures `500`.
fn found(outcome: StoreOutcome<Product>) -> Result<Product, ProductError> {
    match outcome {
        StoreOutcome::Found(product) => Ok(product),
        StoreOutcome::NotFound => Err(ProductError::NotFound),
        StoreOutcome::Failed(err) => Err(ProductError::Store(err)),
    }
}
