// Library crate for the Rarity migration service
// This file exposes the public API for integration tests

pub mod auth;
pub mod chain;
pub mod config;
pub mod migration;
pub mod scoring;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use auth::SignatureVerifier;
pub use chain::{BatchConfig, FetchError, SummonerDiscovery, SummonerReader};
pub use config::AppConfig;
pub use migration::{
    models::{Account, AggregateTotals, MigrationRecord},
    Aggregator, InMemoryMigrationLedger, MigrationError, MigrationLedger, MigrationService,
};
pub use shared::{AppError, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the HTTP router with every route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/check", post(migration::check_migration))
        .route("/api/submit", post(migration::submit_migration))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
