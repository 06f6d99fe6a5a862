//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from study-core
pub use study_core::{
    CardPhase, Catalog, Flashcard, Outcome, OutcomeRecord, RevealMode, SessionConfig,
    SessionStatus, SessionSummary, StudySession,
};

/// Card as shown to the client. Answer and explanation stay hidden until
/// the card is revealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub id: i64,
    pub area: String,
    pub theme: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub phase: CardPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl CardView {
    pub fn new(card: &Flashcard, session: &StudySession) -> Self {
        let entry = session.review_state().entry(card.id);
        let phase = entry.phase();
        let visible = phase != CardPhase::Unrevealed;

        Self {
            id: card.id,
            area: card.area.clone(),
            theme: card.theme.clone(),
            question: card.question.clone(),
            answer: visible.then(|| card.answer.clone()),
            explanation: if visible {
                card.explanation.clone()
            } else {
                None
            },
            phase,
            outcome: entry.outcome,
        }
    }
}

/// Session state returned by every session endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub status: SessionStatus,
    pub total: usize,
    pub reveal_mode: RevealMode,
    pub narrate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CardView>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionView {
    pub fn new(id: Uuid, session: &StudySession) -> Self {
        Self {
            id,
            status: session.status(),
            total: session.queue().len(),
            reveal_mode: session.config().reveal_mode,
            narrate: session.config().narrate,
            current: session.current().map(|card| CardView::new(card, session)),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
        }
    }
}

/// POST /api/sessions/:id/grade body. With `card_id` the grade replaces
/// the outcome of an earlier card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub outcome: Outcome,
    #[serde(default)]
    pub card_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub matching_cards: usize,
    pub queue_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub summary: SessionSummary,
    pub outcomes: Vec<OutcomeRecord>,
}

impl SummaryResponse {
    pub fn new(session_id: Uuid, session: &StudySession) -> Self {
        Self {
            session_id,
            status: session.status(),
            summary: session.summary(),
            outcomes: session.outcomes(),
        }
    }
}
