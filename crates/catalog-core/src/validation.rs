//! # Validation Rules
//!
//! Pure checks run before any write reaches the repository.
//!
//! Create needs a complete record: nothing is defaulted. Update needs a
//! non-empty delta whose present fields each satisfy the create rule for
//! that field. Fields are checked in the order
//! `name, description, price, category, inStock` and the first violation
//! wins, so error messages are deterministic.

use crate::error::{CatalogError, CatalogResult};
use crate::product::{NewProduct, ProductPatch, ProductPayload};
use serde_json::Value;

const UPDATE_FIELDS_REQUIRED: &str =
    "At least one field (name, description, price, category, inStock) must be provided for update.";

/// Validate a create body and turn it into a complete record
pub fn validate_create(payload: &ProductPayload) -> CatalogResult<NewProduct> {
    let name = required_text("name", payload.name.as_ref())?;
    let description = required_text("description", payload.description.as_ref())?;

    let price = match payload.price.as_ref() {
        Some(value) => price(value, "Price must be a positive number.")?,
        None => return Err(missing("price")),
    };

    let category = required_text("category", payload.category.as_ref())?;

    let in_stock = match payload.in_stock.as_ref() {
        Some(value) => flag(value, "inStock must be a boolean.")?,
        None => return Err(missing("inStock")),
    };

    Ok(NewProduct {
        name,
        description,
        price,
        category,
        in_stock,
    })
}

/// Validate an update body and turn it into a delta
pub fn validate_update(payload: &ProductPayload) -> CatalogResult<ProductPatch> {
    if payload.is_empty() {
        return Err(CatalogError::validation(UPDATE_FIELDS_REQUIRED));
    }

    Ok(ProductPatch {
        name: payload.name.as_ref().map(|v| text("name", v)).transpose()?,
        description: payload
            .description
            .as_ref()
            .map(|v| text("description", v))
            .transpose()?,
        price: payload
            .price
            .as_ref()
            .map(|v| price(v, "Price must be a positive number if provided."))
            .transpose()?,
        category: payload
            .category
            .as_ref()
            .map(|v| text("category", v))
            .transpose()?,
        in_stock: payload
            .in_stock
            .as_ref()
            .map(|v| flag(v, "inStock must be a boolean if provided."))
            .transpose()?,
    })
}

fn missing(field: &str) -> CatalogError {
    CatalogError::validation(format!("{} is required for product creation.", field))
}

fn required_text(field: &str, value: Option<&Value>) -> CatalogResult<String> {
    match value {
        Some(value) => text(field, value),
        None => Err(missing(field)),
    }
}

fn text(field: &str, value: &Value) -> CatalogResult<String> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(CatalogError::validation(format!(
            "{} must be a non-empty string.",
            field
        ))),
    }
}

fn price(value: &Value, message: &str) -> CatalogResult<f64> {
    match value.as_f64() {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => Err(CatalogError::validation(message)),
    }
}

fn flag(value: &Value, message: &str) -> CatalogResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| CatalogError::validation(message))
}
