//! Core types for study sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::SessionError;

/// A question/answer study unit tagged with an area and a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub area: String,
    pub theme: String,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// How the filtered card set is ordered before it is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ordering {
    Random,
    Sequential,
}

impl Default for Ordering {
    fn default() -> Self {
        Self::Random
    }
}

/// Whether answers are revealed by the user or by the view after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    Manual,
    Auto,
}

impl Default for RevealMode {
    fn default() -> Self {
        Self::Manual
    }
}

/// Self-graded result for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    Skipped,
}

impl Outcome {
    /// Get the outcome name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Skipped => "skipped",
        }
    }
}

/// Per-card progress within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPhase {
    Unrevealed,
    Revealed,
    Graded,
}

/// User-chosen parameters for one study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Areas to include. Empty means every area.
    pub selected_areas: BTreeSet<String>,
    /// Themes to include. Empty means every theme.
    pub selected_themes: BTreeSet<String>,
    pub card_count: u32,
    pub ordering: Ordering,
    pub reveal_mode: RevealMode,
    pub narrate: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            selected_areas: BTreeSet::new(),
            selected_themes: BTreeSet::new(),
            card_count: 20,
            ordering: Ordering::default(),
            reveal_mode: RevealMode::default(),
            narrate: false,
        }
    }
}

impl SessionConfig {
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.selected_areas.insert(area.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.selected_themes.insert(theme.into());
        self
    }

    pub fn with_card_count(mut self, card_count: u32) -> Self {
        self.card_count = card_count;
        self
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_reveal_mode(mut self, reveal_mode: RevealMode) -> Self {
        self.reveal_mode = reveal_mode;
        self
    }

    pub fn with_narration(mut self, narrate: bool) -> Self {
        self.narrate = narrate;
        self
    }

    /// Reject configs no queue can be built from.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.card_count == 0 {
            return Err(SessionError::InvalidConfig(
                "card_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a card passes the area and theme filters.
    pub fn matches(&self, card: &Flashcard) -> bool {
        let area_ok = self.selected_areas.is_empty() || self.selected_areas.contains(&card.area);
        let theme_ok =
            self.selected_themes.is_empty() || self.selected_themes.contains(&card.theme);
        area_ok && theme_ok
    }
}

/// A graded card handed to the stats collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub card_id: i64,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregate counts for a session queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    pub ungraded: usize,
    /// correct / (correct + incorrect); absent when neither was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}
