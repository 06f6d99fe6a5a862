//! PostgreSQL card repository

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use study_core::{validate_cards, Flashcard, RawFlashcard};

use crate::repository::{CardRepository, RepositoryError};

/// Card row as stored in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbFlashcard {
    pub id: i64,
    pub area: Option<String>,
    pub theme: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl From<DbFlashcard> for RawFlashcard {
    fn from(row: DbFlashcard) -> Self {
        RawFlashcard {
            id: Some(row.id),
            area: row.area,
            theme: row.theme,
            question: row.question,
            answer: row.answer,
            explanation: row.explanation,
        }
    }
}

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get all live card rows in repository order
    pub async fn get_cards(&self) -> Result<Vec<DbFlashcard>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbFlashcard>(
            r#"
            SELECT id, area, theme, question, answer, explanation
            FROM flashcards
            WHERE deleted_at IS NULL
            ORDER BY position, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl CardRepository for Database {
    async fn fetch_all(&self) -> Result<Vec<Flashcard>, RepositoryError> {
        let rows = self.get_cards().await?;
        let cards = validate_cards(rows.into_iter().map(RawFlashcard::from))?;
        Ok(cards)
    }
}
