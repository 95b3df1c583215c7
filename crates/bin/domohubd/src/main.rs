//! # domohubd, the domohub daemon
//!
//! Composition root that wires the adapters into the application services.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Open the `SQLite` database and run migrations
//! - Construct repositories, the gateway client cache and the services
//! - Run the start-up hook (first-run seeding, version bookkeeping)
//! - Release cached gateway clients on shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use domohub_adapter_gateway_tcp::TcpClientFactory;
use domohub_adapter_storage_sqlite_sqlx::{
    SqliteEnvironmentRepository, SqlitePreferenceStore, SqliteRepository,
};
use domohub_app::client_cache::{CacheConfig, GatewayClientCache};
use domohub_app::services::bootstrap::Bootstrap;
use domohub_app::services::domotic_service::LightService;
use domohub_app::services::environment_service::EnvironmentService;
use domohub_app::services::gateway_service::GatewayService;
use domohub_domain::gateway::Gateway;

use crate::config::Config;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Database
    let db = domohub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
        busy_timeout: config.busy_timeout(),
    }
    .build()
    .await
    .with_context(|| format!("failed to open database {}", config.database.url))?;
    let pool = db.pool().clone();

    // Repositories
    let gateway_repo = Arc::new(SqliteRepository::<Gateway>::new(pool.clone()));
    let environment_repo = Arc::new(SqliteEnvironmentRepository::new(pool.clone()));
    let preferences = Arc::new(SqlitePreferenceStore::new(pool.clone()));

    // Gateway clients
    let cache = Arc::new(GatewayClientCache::new(
        Arc::clone(&gateway_repo),
        TcpClientFactory::new(config.connect_timeout()),
        CacheConfig {
            lookup_timeout: config.lookup_timeout(),
            connect_timeout: config.connect_timeout(),
        },
    ));

    // Services
    let environment_service = EnvironmentService::new(Arc::clone(&environment_repo));
    let gateway_service =
        GatewayService::new(gateway_repo, Arc::clone(&cache), Arc::clone(&preferences));
    let light_service = LightService::new(SqliteRepository::new(pool));

    let report = Bootstrap::new(preferences, environment_repo)
        .run(
            env!("CARGO_PKG_VERSION"),
            &config.bootstrap.default_environment,
        )
        .await
        .context("start-up hook failed")?;
    if let Some(previous) = &report.upgraded_from {
        tracing::info!(%previous, "upgraded from an earlier version");
    }

    for environment in environment_service.list_environments().await? {
        let lights = light_service.list_by_environment(environment.id).await?;
        tracing::info!(
            environment_id = %environment.id,
            name = %environment.name,
            lights = lights.len(),
            "environment"
        );
    }
    let gateways = gateway_service.list_gateways().await?;
    let default_gateway = gateway_service.default_gateway().await?;
    tracing::info!(
        gateways = gateways.len(),
        default_gateway = ?default_gateway,
        "domohubd ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    let evicted = cache.clear().await;
    tracing::info!(clients = evicted.len(), "gateway clients released");
    db.close().await;

    Ok(())
}
