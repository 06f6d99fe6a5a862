//! In-memory card repository, optionally loaded from markdown deck files.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use study_core::{assign_ids, parse, CardError, Flashcard};

use super::{CardRepository, RepositoryError};

/// Cards held in memory in repository order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardRepository {
    cards: Vec<Flashcard>,
}

impl InMemoryCardRepository {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    /// Load every `*.md` deck file in `dir`, in file-name order.
    ///
    /// Cards without an `ID:` line get ids after the highest explicit id
    /// across all files. Ids must be unique across the whole directory.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let dir = dir.as_ref();
        let io_error = |source: std::io::Error| RepositoryError::Io {
            path: dir.display().to_string(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_error)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("md") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut parsed = Vec::new();
        for path in &paths {
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| RepositoryError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
            let cards = parse(&content).map_err(|source| RepositoryError::Parse {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!("Parsed {} cards from {}", cards.len(), path.display());
            parsed.extend(cards);
        }

        let cards = assign_ids(parsed, 1).map_err(|source| RepositoryError::Parse {
            path: dir.display().to_string(),
            source,
        })?;
        let mut seen = HashSet::new();
        if let Some(dup) = cards.iter().find(|c| !seen.insert(c.id)) {
            return Err(CardError::DuplicateId { id: dup.id }.into());
        }

        Ok(Self::new(cards))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn fetch_all(&self) -> Result<Vec<Flashcard>, RepositoryError> {
        Ok(self.cards.clone())
    }
}
