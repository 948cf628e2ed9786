//! # Product Repository
//!
//! Sole owner of the live product collection. All reads and writes go
//! through a [`ProductRepository`] handle.
//!
//! The collection sits behind a single `RwLock`: writers hold the
//! exclusive lock for the whole mutation, readers share the lock, so a
//! reader never sees a half-applied write. Listing order is insertion
//! order and is never re-sorted.

use crate::error::{CatalogError, CatalogResult};
use crate::product::{NewProduct, Product, ProductPatch};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Default page when the caller gives none
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size when the caller gives none
pub const DEFAULT_LIMIT: u64 = 10;

/// Listing filter. All present conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive exact category match
    pub category: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
}

impl ProductFilter {
    /// Build a filter, treating empty strings as "no condition"
    pub fn new(category: Option<&str>, search: Option<&str>) -> Self {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            category: non_empty(category),
            search: non_empty(search),
        }
    }

    /// Check a product against every present condition
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| product.in_category(c));
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |s| product.mentions(s));
        category_ok && search_ok
    }
}

/// A validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    /// Both values must be `>= 1`
    pub fn new(page: i64, limit: i64) -> CatalogResult<Self> {
        if page < 1 {
            return Err(CatalogError::validation(
                "Page parameter must be a positive number.",
            ));
        }
        if limit < 1 {
            return Err(CatalogError::validation(
                "Limit parameter must be a positive number.",
            ));
        }
        Ok(Self {
            page: page as u64,
            limit: limit as u64,
        })
    }

    /// Parse raw query-string values, applying defaults for absent ones
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> CatalogResult<Self> {
        let page = parse_positive(page, DEFAULT_PAGE, "Page parameter must be a positive number.")?;
        let limit = parse_positive(
            limit,
            DEFAULT_LIMIT,
            "Limit parameter must be a positive number.",
        )?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Half-open window `[(page-1)*limit, page*limit)` clamped to `len`
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.page - 1).saturating_mul(self.limit);
        let end = self.page.saturating_mul(self.limit);
        let clamp = |n: u64| usize::try_from(n).unwrap_or(usize::MAX).min(len);
        clamp(start)..clamp(end)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u64, message: &str) -> CatalogResult<u64> {
    let digits = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(s) => s.strip_prefix('+').unwrap_or(s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::validation(message));
    }
    match digits.parse::<u64>() {
        Ok(0) => Err(CatalogError::validation(message)),
        Ok(n) => Ok(n),
        // all digits but wider than u64: a page past any data
        Err(_) => Ok(u64::MAX),
    }
}

/// One page of a filtered listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    /// Post-filter, pre-pagination count
    #[serde(rename = "totalProducts")]
    pub total_matching: usize,
    #[serde(rename = "currentPage")]
    pub page: u64,
    #[serde(rename = "perPage")]
    pub limit: u64,
    #[serde(rename = "products")]
    pub items: Vec<Product>,
}

/// Aggregates over the whole, unfiltered collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_products: usize,
    /// Keyed by the category string as stored
    pub count_by_category: BTreeMap<String, usize>,
    pub in_stock: usize,
    pub out_of_stock: usize,
    /// Mean price rounded to 2 decimals, 0 for an empty collection
    pub average_price: f64,
}

impl StatsReport {
    fn compute(products: &[Product]) -> Self {
        let mut count_by_category = BTreeMap::new();
        let mut in_stock = 0;
        let mut total_price = 0.0;

        for product in products {
            *count_by_category.entry(product.category.clone()).or_insert(0) += 1;
            if product.in_stock {
                in_stock += 1;
            }
            total_price += product.price;
        }

        let count = products.len() as f64;
        let average_price = if products.is_empty() {
            0.0
        } else if total_price.is_finite() {
            round_cents(total_price / count)
        } else {
            // the plain sum overflowed; averaging term by term stays finite
            round_cents(products.iter().map(|p| p.price / count).sum())
        };

        Self {
            total_products: products.len(),
            count_by_category,
            in_stock,
            out_of_stock: products.len() - in_stock,
            average_price,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    let cents = value * 100.0;
    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        value
    }
}

/// Shared handle to the in-memory product collection
#[derive(Debug, Clone, Default)]
pub struct ProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl ProductRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding `products` in the given order.
    ///
    /// Fails if two records share an id.
    pub fn from_seed(products: Vec<Product>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::Configuration(format!(
                    "duplicate product id in seed: {}",
                    product.id
                )));
            }
        }
        Ok(Self {
            products: Arc::new(RwLock::new(products)),
        })
    }

    /// Store a validated record under a freshly generated id
    pub fn create(&self, new: NewProduct) -> Product {
        let product = Product::from_new(Uuid::new_v4().to_string(), new);
        self.products.write().push(product.clone());
        info!(id = %product.id, name = %product.name, "product created");
        product
    }

    /// Exact lookup by id
    pub fn get(&self, id: &str) -> CatalogResult<Product> {
        debug!(id, "product lookup");
        self.products
            .read()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(id))
    }

    /// Merge a validated delta into an existing record
    pub fn update(&self, id: &str, patch: &ProductPatch) -> CatalogResult<Product> {
        let mut products = self.products.write();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::not_found(id))?;
        product.apply(patch);
        info!(id, "product updated");
        Ok(product.clone())
    }

    /// Remove a record. Ids are never handed out again.
    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        let mut products = self.products.write();
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CatalogError::not_found(id))?;
        products.remove(index);
        info!(id, "product deleted");
        Ok(())
    }

    /// Filter, then paginate, in insertion order
    pub fn list(&self, filter: &ProductFilter, pagination: Pagination) -> ProductPage {
        let products = self.products.read();
        let matching: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
        let window = pagination.window(matching.len());

        ProductPage {
            total_matching: matching.len(),
            page: pagination.page(),
            limit: pagination.limit(),
            items: matching[window].iter().map(|p| (*p).clone()).collect(),
        }
    }

    /// Aggregate statistics over every product
    pub fn stats(&self) -> StatsReport {
        StatsReport::compute(&self.products.read())
    }

    /// Number of live products
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}
