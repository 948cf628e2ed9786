//! # Product Catalog Server
//!
//! In-memory product catalog over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Shared secret for gated routes
//! export API_KEY=change-me
//! # Which routes need it (default: create,update,delete)
//! export PROTECTED_ROUTES=create,update,delete
//!
//! # Run the server
//! catalog-server
//! ```

use catalog_api::{routes, AppConfig, AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::new(config)?;

    let addr = state.config.socket_addr()?;
    let protected: Vec<_> = state.config.gate_policy.protected().collect();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.repository.len());
    info!("Gated routes: {:?}", protected);
    if !protected.is_empty() && !state.gate.is_configured() {
        warn!("API_KEY is not set; every gated route will answer 401");
    }

    let is_prod = state.config.is_production();
    let app = routes::create_router(state);

    info!("Product API starting on http://{}", addr);
    if !is_prod {
        info!("Products: GET http://{}/api/products (?category, ?search, ?page, ?limit)", addr);
        info!("Stats:    GET http://{}/api/products/stats", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
