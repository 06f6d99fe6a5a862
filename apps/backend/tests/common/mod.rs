//! Common test utilities and fixtures for integration tests.
//!
//! Tests run the full router against an in-memory card repository, so no
//! database is required.

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;

use legal_study_backend::repository::{CardRepository, InMemoryCardRepository, RepositoryError};
use legal_study_backend::services::sessions::SessionStore;
use legal_study_backend::{router, AppState};
use study_core::Flashcard;

/// Test context holding the shared session store and a test server.
pub struct TestContext {
    pub sessions: Arc<SessionStore>,
    pub server: TestServer,
}

impl TestContext {
    /// Create a context serving the given cards.
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self::with_repository(Arc::new(InMemoryCardRepository::new(cards)))
    }

    /// Create a context serving the given cards whose sessions expire
    /// after `ttl` of inactivity.
    pub fn with_session_ttl(cards: Vec<Flashcard>, ttl: Duration) -> Self {
        let state = AppState::with_sessions(
            Arc::new(InMemoryCardRepository::new(cards)),
            SessionStore::with_ttl(ttl),
        );
        Self::from_state(state)
    }

    /// Create a context over any repository.
    pub fn with_repository(cards: Arc<dyn CardRepository>) -> Self {
        Self::from_state(AppState::new(cards))
    }

    fn from_state(state: AppState) -> Self {
        let sessions = state.sessions.clone();
        let server = TestServer::new(router(state)).expect("Failed to start test server");
        Self { sessions, server }
    }
}

/// Repository whose fetch always fails, standing in for a network outage.
pub struct FailingRepository;

#[async_trait]
impl CardRepository for FailingRepository {
    async fn fetch_all(&self) -> Result<Vec<Flashcard>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}
