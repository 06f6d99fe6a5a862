//! Card repository abstraction.
//!
//! The scheduler only ever sees validated [`Flashcard`]s; every source
//! converts its records at this boundary.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use study_core::{CardError, Flashcard, ParseError};

pub use memory::InMemoryCardRepository;

/// Failures fetching cards from a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("invalid card record: {0}")]
    Invalid(#[from] CardError),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Source of the full flashcard set.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Fetch every card in repository order.
    async fn fetch_all(&self) -> Result<Vec<Flashcard>, RepositoryError>;
}
