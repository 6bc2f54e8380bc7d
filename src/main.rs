//! petdex-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints,
//! optionally backed by PostgreSQL for durable storage.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use petdex_gateway::api;
use petdex_gateway::app_state::AppState;
use petdex_gateway::config::GatewayConfig;
use petdex_gateway::domain::{
    AnimalDirectory, HeartRateStore, LocationStore, RealtimeNotifier, SafeZoneStore,
};
use petdex_gateway::persistence::PostgresPersistence;
use petdex_gateway::service::{AnimalService, HeartRateService, LocationService, SafeZoneService};
use petdex_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, "starting petdex-gateway");

    // Build domain layer
    let animals = Arc::new(AnimalDirectory::new());
    let zones = Arc::new(SafeZoneStore::new());
    let locations = Arc::new(LocationStore::new());
    let heart_rates = Arc::new(HeartRateStore::new());
    let notifier = Arc::new(RealtimeNotifier::new());

    // Optionally connect to PostgreSQL and re-hydrate the stores
    let persistence = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await
            .context("failed to connect to PostgreSQL")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        let persistence = PostgresPersistence::new(pool);
        hydrate(&persistence, &animals, &zones, &locations, &heart_rates, &config).await?;
        Some(persistence)
    } else {
        tracing::info!("persistence disabled, running in-memory only");
        None
    };

    // Build service layer
    let animal_service = Arc::new(AnimalService::new(
        Arc::clone(&animals),
        Arc::clone(&zones),
        persistence.clone(),
    ));
    let safe_zone_service = Arc::new(SafeZoneService::new(
        Arc::clone(&zones),
        Arc::clone(&animals),
        persistence.clone(),
    ));
    let location_service = Arc::new(LocationService::new(
        Arc::clone(&locations),
        Arc::clone(&zones),
        Arc::clone(&animals),
        Arc::clone(&notifier),
        persistence.clone(),
    ));
    let heart_rate_service = Arc::new(HeartRateService::new(
        Arc::clone(&heart_rates),
        Arc::clone(&animals),
        Arc::clone(&notifier),
        persistence,
    ));

    // Build application state
    let app_state = AppState {
        animal_service,
        safe_zone_service,
        location_service,
        heart_rate_service,
        notifier,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Re-hydrates the in-memory stores from durable storage: every animal
/// and safe zone, plus a bounded window of recent readings per animal.
async fn hydrate(
    persistence: &PostgresPersistence,
    animals: &AnimalDirectory,
    zones: &SafeZoneStore,
    locations: &LocationStore,
    heart_rates: &HeartRateStore,
    config: &GatewayConfig,
) -> anyhow::Result<()> {
    let records = persistence.load_animals().await?;
    let animal_count = records.len();
    for record in records {
        let animal_id = record.id;
        animals.restore(record).await;

        for reading in persistence
            .load_locations_by_animal(*animal_id.as_uuid(), config.hydrate_readings_limit)
            .await?
        {
            locations.insert(reading).await;
        }
        for reading in persistence
            .load_heart_rates_by_animal(*animal_id.as_uuid(), config.hydrate_readings_limit)
            .await?
        {
            heart_rates.insert(reading).await;
        }
    }

    let zone_records = persistence.load_zones().await?;
    let zone_count = zone_records.len();
    for zone in zone_records {
        zones.restore(zone).await;
    }

    tracing::info!(animals = animal_count, zones = zone_count, "stores hydrated from database");
    Ok(())
}
