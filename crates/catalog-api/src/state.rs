//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the product repository, the access gate, and configuration.

use crate::auth::{AccessGate, GatePolicy};
use catalog_core::{seed, CatalogError, CatalogResult, ProductRepository};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Shared secret expected in `x-api-key`
    pub api_key: Option<String>,
    /// Operations that require the shared secret
    pub gate_policy: GatePolicy,
    /// TOML file with the startup products
    pub products_file: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> CatalogResult<Self> {
        dotenvy::dotenv().ok();

        let gate_policy = match std::env::var("PROTECTED_ROUTES") {
            Ok(routes) => GatePolicy::parse(&routes)?,
            Err(_) => GatePolicy::default(),
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            api_key: std::env::var("API_KEY").ok(),
            gate_policy,
            products_file: std::env::var("PRODUCTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/products.toml")),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> CatalogResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CatalogError::Configuration(format!("invalid socket address: {}", e)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            api_key: None,
            gate_policy: GatePolicy::default(),
            products_file: PathBuf::from("config/products.toml"),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product repository
    pub repository: ProductRepository,
    /// Shared-secret check
    pub gate: AccessGate,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from config, loading the seed products
    pub fn new(config: AppConfig) -> CatalogResult<Self> {
        let repository = seed::load_repository(&config.products_file)?;
        Ok(Self::with_repository(config, repository))
    }

    /// Build state around an existing repository
    pub fn with_repository(config: AppConfig, repository: ProductRepository) -> Self {
        Self {
            gate: AccessGate::new(config.api_key.clone()),
            repository,
            config,
        }
    }
}
