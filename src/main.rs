//! Equipe Backend
//!
//! A REST backend for tracking team members and work activities, backed
//! interchangeably by SQLite or a Firebase Realtime Database tree.

mod api;
mod config;
mod errors;
mod models;
mod report;
mod store;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, StorageBackend};
use store::{FirebaseStore, SqliteStore, Store};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Equipe Backend");
    tracing::info!("Storage backend: {:?}", config.storage);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize the selected storage backend
    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Sqlite => {
            tracing::info!("Database path: {:?}", config.db_path);
            let pool = store::init_database(&config.db_path).await?;
            Arc::new(SqliteStore::new(pool))
        }
        StorageBackend::Firebase => {
            let url = config
                .firebase_url
                .clone()
                .ok_or("EQUIPE_FIREBASE_URL is required for the firebase backend")?;
            tracing::info!("Document store URL: {}", url);
            Arc::new(FirebaseStore::new(url, config.firebase_auth.clone()))
        }
    };

    // Seed placeholder members on first start; also surfaces a bad
    // connection or credential as a startup failure.
    let seeded = store::seed_members(store.as_ref()).await?;
    if seeded > 0 {
        tracing::info!("Seeded {} placeholder members", seeded);
    }

    // Create application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
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

    // API routes
    let api_routes = Router::new()
        // Members
        .route("/members", get(api::list_members))
        .route("/members", post(api::create_member))
        .route("/members/{id}", delete(api::delete_member))
        // Activities
        .route("/activities", get(api::list_activities))
        .route("/activities", post(api::create_activity))
        .route("/activities/{id}", delete(api::delete_activity))
        // Report
        .route("/report", get(api::get_report));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
