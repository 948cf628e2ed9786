//! # catalog-api
//!
//! HTTP API layer for the product catalog.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints over the product repository
//! - A per-route shared-secret access gate
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/products` | List products (filter + paginate) |
//! | GET | `/api/products/stats` | Catalog statistics |
//! | GET | `/api/products/{id}` | Get product |
//! | POST | `/api/products` | Create product |
//! | PUT | `/api/products/{id}` | Update product |
//! | DELETE | `/api/products/{id}` | Delete product |

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{AccessGate, GatePolicy, Operation};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
