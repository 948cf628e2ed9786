//! # Seed Data
//!
//! The fixed set of products a process starts with. Loaded from a TOML
//! file when one is configured and present, otherwise the built-in set.
//!
//! ```toml
//! [[products]]
//! id = "1"
//! name = "Laptop"
//! description = "High-performance laptop with 16GB RAM"
//! price = 1200.0
//! category = "electronics"
//! inStock = true
//! ```

use crate::error::{CatalogError, CatalogResult};
use crate::product::{NewProduct, Product, ProductPayload};
use crate::repository::ProductRepository;
use crate::validation::validate_create;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    products: Vec<Product>,
}

/// Parse seed records from a TOML string.
///
/// Every record must pass the create rules.
pub fn from_toml(toml_str: &str) -> CatalogResult<Vec<Product>> {
    let file: SeedFile = toml::from_str(toml_str)
        .map_err(|e| CatalogError::Configuration(format!("invalid seed file: {}", e)))?;

    for product in &file.products {
        let new = NewProduct {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            in_stock: product.in_stock,
        };
        validate_create(&ProductPayload::from(new)).map_err(|e| {
            CatalogError::Configuration(format!("seed product {}: {}", product.id, e))
        })?;
    }

    Ok(file.products)
}

/// Build the startup repository from `path`, falling back to the
/// built-in products when the file does not exist.
pub fn load_repository(path: impl AsRef<Path>) -> CatalogResult<ProductRepository> {
    let path = path.as_ref();
    let products = match std::fs::read_to_string(path) {
        Ok(content) => {
            let products = from_toml(&content)?;
            info!("Loaded {} products from {}", products.len(), path.display());
            products
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No seed file at {}, using built-in products", path.display());
            builtin()
        }
        Err(e) => {
            return Err(CatalogError::Configuration(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };
    ProductRepository::from_seed(products)
}

/// The built-in starter catalog
pub fn builtin() -> Vec<Product> {
    [
        ("1", "Laptop", "High-performance laptop with 16GB RAM", 1200.0, "electronics", true),
        ("2", "Smartphone", "Latest model with 128GB storage", 800.0, "electronics", true),
        ("3", "Coffee Maker", "Programmable coffee maker with timer", 50.0, "kitchen", false),
        ("4", "Wireless Mouse", "Ergonomic wireless mouse with adjustable DPI", 25.0, "accessories", true),
        ("5", "Mechanical Keyboard", "RGB backlit keyboard with clicky switches", 90.0, "accessories", true),
        ("6", "Blender", "High-speed blender for smoothies and shakes", 70.0, "kitchen", true),
        ("7", "Smartwatch", "Fitness tracker with heart rate monitor", 150.0, "wearables", false),
        ("8", "External SSD", "1TB portable solid-state drive for fast storage", 100.0, "electronics", true),
    ]
    .into_iter()
    .map(|(id, name, description, price, category, in_stock)| Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        in_stock,
    })
    .collect()
}
