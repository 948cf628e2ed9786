//! # Access Gate
//!
//! Shared-secret check on the `x-api-key` header.
//!
//! Which operations are gated is configuration ([`GatePolicy`]), applied
//! per route by the router, so each endpoint can be opened or closed on
//! its own.

use crate::handlers::{catalog_error_to_response, ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use catalog_core::{CatalogError, CatalogResult};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

const UNAUTHORIZED: &str = "Unauthorized: Invalid or missing API key";

/// A repository operation reachable through the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    List,
    Stats,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::List,
        Operation::Stats,
        Operation::Get,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Stats => "stats",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl FromStr for Operation {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::Configuration(format!("unknown route name: {}", s)))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of operations that require the API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    protected: BTreeSet<Operation>,
}

impl GatePolicy {
    /// Gate nothing
    pub fn open() -> Self {
        Self {
            protected: BTreeSet::new(),
        }
    }

    /// Gate everything
    pub fn all() -> Self {
        Self::only(Operation::ALL)
    }

    /// Gate exactly the given operations
    pub fn only(ops: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            protected: ops.into_iter().collect(),
        }
    }

    /// Parse `all`, `none`, or a comma-separated list of operation names
    pub fn parse(routes: &str) -> CatalogResult<Self> {
        match routes.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::all()),
            "" | "none" => Ok(Self::open()),
            list => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Operation::from_str)
                .collect::<CatalogResult<BTreeSet<_>>>()
                .map(|protected| Self { protected }),
        }
    }

    pub fn protects(&self, op: Operation) -> bool {
        self.protected.contains(&op)
    }

    pub fn protected(&self) -> impl Iterator<Item = Operation> + '_ {
        self.protected.iter().copied()
    }
}

impl Default for GatePolicy {
    /// Writes are gated, reads are open
    fn default() -> Self {
        Self::only([Operation::Create, Operation::Update, Operation::Delete])
    }
}

/// Holds the expected secret. No configured secret rejects every gated request.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    expected: Option<Arc<str>>,
}

impl AccessGate {
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Check a presented key
    pub fn check(&self, presented: Option<&str>) -> CatalogResult<()> {
        match (self.expected.as_deref(), presented) {
            (Some(expected), Some(key)) if constant_time_compare(expected, key) => Ok(()),
            _ => Err(CatalogError::Unauthorized(UNAUTHORIZED.to_string())),
        }
    }
}

/// Middleware rejecting requests without the right `x-api-key`
///
/// ```ignore
/// let route = post(handlers::create_product)
///     .route_layer(axum::middleware::from_fn_with_state(gate, require_api_key));
/// ```
pub async fn require_api_key(
    State(gate): State<AccessGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = gate.check(presented) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "access gate rejected request"
        );
        return Err(catalog_error_to_response(e));
    }

    Ok(next.run(request).await)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}
