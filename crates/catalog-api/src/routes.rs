//! # Routes
//!
//! Axum router configuration for the product API.

use crate::auth::{require_api_key, Operation};
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Create the main application router
///
/// Routes:
///   - GET    /                       - Welcome text
///   - GET    /health                 - Health check
///   - GET    /api/products           - List (?category, ?search, ?page, ?limit), also with a trailing slash
///   - GET    /api/products/stats     - Catalog statistics
///   - GET    /api/products/{id}      - Get product by ID
///   - POST   /api/products           - Create product
///   - PUT    /api/products/{id}      - Partially update product
///   - DELETE /api/products/{id}      - Delete product
///
/// Each product route is wrapped in the access gate when the configured
/// `GatePolicy` protects its operation.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .nest("/api/products", product_routes(&state))
        // nested "/" only matches the bare prefix
        .route("/api/products/", collection_route(&state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors),
        )
        .with_state(state)
}

/// Product routes, gated per operation
pub fn product_routes(state: &AppState) -> Router<AppState> {
    let gated = |route: MethodRouter<AppState>, op: Operation| gate(state, route, op);

    Router::new()
        .route("/", collection_route(state))
        // static segment, matched ahead of /{product_id}
        .route("/stats", gated(get(handlers::product_stats), Operation::Stats))
        .route(
            "/{product_id}",
            gated(get(handlers::get_product), Operation::Get)
                .merge(gated(put(handlers::update_product), Operation::Update))
                .merge(gated(delete(handlers::delete_product), Operation::Delete)),
        )
}

/// List and create on the collection path
fn collection_route(state: &AppState) -> MethodRouter<AppState> {
    gate(state, get(handlers::list_products), Operation::List)
        .merge(gate(state, post(handlers::create_product), Operation::Create))
}

fn gate(state: &AppState, route: MethodRouter<AppState>, op: Operation) -> MethodRouter<AppState> {
    if state.config.gate_policy.protects(op) {
        route.route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_api_key,
        ))
    } else {
        route
    }
}
