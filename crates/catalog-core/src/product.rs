//! # Product Types
//!
//! The product record stored by the repository, plus the three shapes a
//! write goes through on its way in:
//!
//! ```text
//! ProductPayload ──validate_create──▶ NewProduct ──repository.create──▶ Product
//! ProductPayload ──validate_update──▶ ProductPatch ──repository.update──▶ Product
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier, assigned by the repository
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Unit price, always strictly positive
    pub price: f64,

    /// Category label, matched case-insensitively by filters
    pub category: String,

    /// Whether the product is currently in stock
    pub in_stock: bool,
}

impl Product {
    /// Build a stored product from a validated create record
    pub fn from_new(id: impl Into<String>, new: NewProduct) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            in_stock: new.in_stock,
        }
    }

    /// Replace every field present in `patch`. The id is never touched.
    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
    }

    /// Case-insensitive exact category match
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Case-insensitive substring match against name or description
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// A complete, validated create record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

/// A validated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    /// True if the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}

/// Raw write body as sent by a client.
///
/// Fields are kept as untyped JSON so that a wrong type is reported by the
/// validation rules instead of failing deserialization. `null` counts as
/// absent and unknown keys (including `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub in_stock: Option<Value>,
}

impl ProductPayload {
    /// True if none of the recognised fields were supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
    }
}

impl From<NewProduct> for ProductPayload {
    fn from(new: NewProduct) -> Self {
        Self {
            name: Some(Value::from(new.name)),
            description: Some(Value::from(new.description)),
            price: Some(Value::from(new.price)),
            category: Some(Value::from(new.category)),
            in_stock: Some(Value::from(new.in_stock)),
        }
    }
}
