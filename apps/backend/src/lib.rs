pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CardSource, Config};
use crate::db::Database;
use crate::repository::{CardRepository, InMemoryCardRepository};
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<dyn CardRepository>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self::with_sessions(cards, SessionStore::new())
    }

    pub fn with_sessions(cards: Arc<dyn CardRepository>, sessions: SessionStore) -> Self {
        Self {
            cards,
            sessions: Arc::new(sessions),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Card routes
        .route("/api/cards/catalog", get(routes::cards::catalog))
        // Session routes
        .route("/api/sessions", post(routes::sessions::create))
        .route("/api/sessions/preview", post(routes::sessions::preview))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::discard),
        )
        .route("/api/sessions/:id/reveal", post(routes::sessions::reveal))
        .route("/api/sessions/:id/grade", post(routes::sessions::grade))
        .route("/api/sessions/:id/advance", post(routes::sessions::advance))
        .route("/api/sessions/:id/summary", get(routes::sessions::summary))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cards: Arc<dyn CardRepository> = match &config.card_source {
        CardSource::Postgres { url } => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(url).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Arc::new(db)
        }
        CardSource::Directory(dir) => {
            tracing::info!("Loading deck files from {}", dir.display());
            let repo = InMemoryCardRepository::load_dir(dir).await?;
            tracing::info!("Loaded {} cards", repo.len());
            Arc::new(repo)
        }
    };

    tracing::info!("Evicting sessions idle for {:?}", config.session_ttl);
    let state = AppState::with_sessions(cards, SessionStore::with_ttl(config.session_ttl));

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
