//! Hookline API server entry point.

use std::error::Error;
use std::sync::Arc;

use hookline_api::config::ServiceConfig;
use hookline_api::error::AppError;
use hookline_api::routes;
use hookline_api::state::AppState;
use hookline_api::telemetry;
use hookline_core::clock::SystemClock;
use hookline_delivery::{DeliveryClient, ReqwestTransport};
use hookline_dispatch::application::runs::BackfillRuns;
use hookline_store::{MIGRATOR, PgConfigStore, PgSubmissionStore};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = ServiceConfig::from_env()?;

    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;
    tracing::info!("Starting Hookline dispatch service");

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(AppError::Database)?;
    MIGRATOR.run(&pool).await.map_err(AppError::Migration)?;

    // Build application state.
    let delivery = DeliveryClient::new(Arc::new(ReqwestTransport::default()), config.delivery);
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgConfigStore::new(pool.clone())),
        Arc::new(PgSubmissionStore::new(pool)),
        delivery,
        config.callback_secrets.clone(),
    );
    let backfill_runs = app_state.backfill_runs.clone();

    // Build router.
    // TODO: Replace CorsLayer::permissive() with the admin UI origin once it is deployed.
    let app = routes::app()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Server)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(backfill_runs))
        .await
        .map_err(AppError::Server)?;

    telemetry.shutdown();
    Ok(())
}

/// Resolves on Ctrl-C, stopping any running backfill at its next checkpoint.
async fn shutdown_signal(backfill_runs: BackfillRuns) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    let cancelled = backfill_runs.cancel_all();
    tracing::info!(cancelled, "shutting down");
}
