//! # catalog-core
//!
//! Core types for the product catalog service.
//!
//! This crate provides:
//! - `Product`, `NewProduct`, `ProductPatch` and `ProductPayload`
//! - Validation rules for create and update bodies
//! - `ProductRepository`, the in-memory store with filtering, pagination and stats
//! - Seed data loading
//! - `CatalogError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use catalog_core::{validate_create, Pagination, ProductFilter, ProductPayload, ProductRepository};
//!
//! let repo = ProductRepository::new();
//!
//! let payload: ProductPayload = serde_json::from_str(
//!     r#"{"name":"Kettle","description":"Electric kettle","price":30,"category":"kitchen","inStock":true}"#,
//! ).unwrap();
//! let product = repo.create(validate_create(&payload).unwrap());
//!
//! let page = repo.list(&ProductFilter::new(Some("KITCHEN"), None), Pagination::default());
//! assert_eq!(page.items, vec![product]);
//! ```

pub mod error;
pub mod product;
pub mod repository;
pub mod seed;
pub mod validation;

// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use product::{NewProduct, Product, ProductPatch, ProductPayload};
pub use repository::{Pagination, ProductFilter, ProductPage, ProductRepository, StatsReport};
pub use validation::{validate_create, validate_update};
