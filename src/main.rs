use std::sync::Arc;
use std::time::Duration;

use rarity_migrator::{
    chain::{RpcSummonerReader, SubgraphDiscovery, SummonerDiscovery, SummonerReader},
    migration::{MigrationLedger, PostgresMigrationLedger},
    scoring::RarityLevelCurve,
    Aggregator, AppConfig, AppState, InMemoryMigrationLedger, MigrationService, SignatureVerifier,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rarity_migrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Rarity migration server");

    let config = AppConfig::from_env().expect("Invalid configuration");

    let ledger: Arc<dyn MigrationLedger> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(5))
                .connect(database_url)
                .await
                .expect("Failed to connect to database");
            let ledger = PostgresMigrationLedger::new(pool);
            ledger
                .ensure_schema()
                .await
                .expect("Failed to prepare migrations table");
            Arc::new(ledger)
        }
        None => {
            warn!("DATABASE_URL not set, migrations are kept in memory only");
            Arc::new(InMemoryMigrationLedger::new())
        }
    };

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .expect("Failed to build HTTP client");

    let discovery: Arc<dyn SummonerDiscovery> = Arc::new(SubgraphDiscovery::new(
        client.clone(),
        config.subgraph_url.clone(),
        config.subgraph_page_size,
    ));
    let reader: Arc<dyn SummonerReader> = Arc::new(RpcSummonerReader::new(
        client,
        config.rpc_url.clone(),
        config.library_address,
    ));

    let aggregator = Aggregator::new(
        discovery,
        reader,
        Arc::new(RarityLevelCurve::new()),
        config.batch,
    );
    let service = MigrationService::new(
        SignatureVerifier::new(config.migration_message.clone()),
        ledger,
        aggregator,
    );

    let app = rarity_migrator::app(AppState::new(Arc::new(service)));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!(bind_addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await.expect("Server error");
}
