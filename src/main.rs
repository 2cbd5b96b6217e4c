//! Campus Resources Backend
//!
//! REST backend for training enrollment and facility rental administration,
//! serving an in-memory store with SQLite snapshot persistence.

mod api;
mod config;
mod db;
mod errors;
mod export;
mod models;
mod store;
mod views;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use models::{Campus, Facility, School, Training, User};
use store::{Activatable, Entity, SharedStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SharedStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Campus Resources Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database; without it the store still serves from memory
    let repo = if config.persist {
        tracing::info!("Database path: {:?}", config.db_path);
        match db::init_database(&config.db_path).await {
            Ok(pool) => Some(Repository::new(pool)),
            Err(e) => {
                tracing::warn!("Database unavailable, running in memory only: {}", e);
                None
            }
        }
    } else {
        tracing::info!("Persistence disabled, running in memory only");
        None
    };

    let store = SharedStore::open(
        repo,
        config.seed,
        config.read_timeout,
        config.write_timeout,
    )
    .await;

    // Create application state
    let state = AppState {
        store: Arc::new(store),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Datastore
        .route("/api/datastore", get(api::get_datastore))
        .route("/api/datastore/revision", get(api::get_revision))
        .route("/api/stats", get(api::get_stats))
        // Requests
        .route(
            "/api/requests/{kind}",
            get(api::list_requests).post(api::submit_request),
        )
        .route("/api/requests/{kind}/export", get(api::export_requests))
        .route(
            "/api/requests/{kind}/{id}",
            get(api::get_request).delete(api::delete_request),
        )
        .route(
            "/api/requests/{kind}/{id}/status",
            put(api::set_request_status),
        );

    // Resources
    let api_routes = record_routes::<Training>(api_routes);
    let api_routes = status_route::<Training>(api_routes);
    let api_routes = record_routes::<Facility>(api_routes);
    let api_routes = status_route::<Facility>(api_routes);
    let api_routes = record_routes::<Campus>(api_routes);
    let api_routes = status_route::<Campus>(api_routes);
    let api_routes = record_routes::<School>(api_routes);
    let api_routes = record_routes::<User>(api_routes);

    Router::new()
        .merge(api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// List, create, export, get, update and delete routes under `/api/{T::PATH}`.
fn record_routes<T: Entity>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/api/{}", T::PATH);
    router
        .route(
            &base,
            get(api::list_records::<T>).post(api::create_record::<T>),
        )
        .route(&format!("{}/export", base), get(api::export_records::<T>))
        .route(
            &format!("{}/{{id}}", base),
            get(api::get_record::<T>)
                .put(api::update_record::<T>)
                .delete(api::delete_record::<T>),
        )
}

fn status_route<T: Activatable>(router: Router<AppState>) -> Router<AppState> {
    router.route(
        &format!("/api/{}/{{id}}/status", T::PATH),
        put(api::set_record_status::<T>),
    )
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
