//! # Request Handlers
//!
//! Axum request handlers for the product API.
//! Each handler validates input, calls the repository, and shapes the response.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use catalog_core::{
    validate_create, validate_update, CatalogError, Pagination, Product, ProductFilter,
    ProductPage, ProductPayload, StatsReport,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query string for the listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Kept raw so a bad value becomes a validation error, not a rejection
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn catalog_error_to_response(err: CatalogError) -> ApiError {
    let code = err.status_code();
    if !err.is_client_error() {
        error!("Unexpected error: {}", err);
    }
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn body_or_error(body: Result<Json<ProductPayload>, JsonRejection>) -> Result<ProductPayload, ApiError> {
    body.map(|Json(payload)| payload).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        let (status, Json(response)) =
            catalog_error_to_response(CatalogError::validation("Request body must be a JSON object."));
        (status, Json(response.with_details(rejection.body_text())))
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Root welcome text
pub async fn index() -> &'static str {
    "Welcome to the Product API! Go to /api/products to see all products."
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "product-catalog",
        "version": env!("CARGO_PKG_VERSION"),
        "products": state.repository.len()
    }))
}

/// List products with optional category/search filters and pagination
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductPage>, ApiError> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref())
        .map_err(catalog_error_to_response)?;
    let filter = ProductFilter::new(params.category.as_deref(), params.search.as_deref());

    Ok(Json(state.repository.list(&filter, pagination)))
}

/// Aggregate statistics over the whole catalog
pub async fn product_stats(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.repository.stats())
}

/// Get single product
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .repository
        .get(&product_id)
        .map(Json)
        .map_err(|e| {
            warn!("Product {} not found", product_id);
            catalog_error_to_response(e)
        })
}

/// Create a product from a complete body
#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let payload = body_or_error(body)?;
    let new = validate_create(&payload).map_err(catalog_error_to_response)?;

    let product = state.repository.create(new);
    info!("Created product {}", product.id);

    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to an existing product
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let payload = body_or_error(body)?;
    let patch = validate_update(&payload).map_err(catalog_error_to_response)?;

    state
        .repository
        .update(&product_id, &patch)
        .map(Json)
        .map_err(catalog_error_to_response)
}

/// Delete a product
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .repository
        .delete(&product_id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(catalog_error_to_response)
}
