//! Study session state machine.
//!
//! A session moves `Setup -> Running -> Complete`. The setup phase is the
//! [`SessionConfig`] itself; [`StudySession::start`] builds the queue and
//! enters `Running` at the first card. `Complete` is terminal: a new
//! session is always started from scratch with a fresh queue and review
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::SessionError;
use crate::review::ReviewState;
use crate::scheduler::{self, Advance, SessionQueue};
use crate::types::{
    CardPhase, Flashcard, Outcome, OutcomeRecord, RevealMode, SessionConfig, SessionSummary,
};

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    Running { index: usize },
    Complete,
}

/// One bounded run over a queue of cards.
#[derive(Debug, Clone)]
pub struct StudySession {
    config: SessionConfig,
    queue: SessionQueue,
    review: ReviewState,
    status: SessionStatus,
    graded_at: HashMap<i64, DateTime<Utc>>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
    /// Start a session over `all_cards`.
    pub fn start(all_cards: &[Flashcard], config: SessionConfig) -> Result<Self, SessionError> {
        let queue = scheduler::build_queue(all_cards, &config)?;
        Self::with_queue(queue, config, Utc::now())
    }

    /// Start a session over an already built queue.
    ///
    /// An empty queue has no first card to run from and is rejected.
    pub fn with_queue(
        queue: SessionQueue,
        config: SessionConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if queue.is_empty() {
            return Err(SessionError::EmptyResult);
        }
        Ok(Self {
            config,
            queue,
            review: ReviewState::new(),
            status: SessionStatus::Running { index: 0 },
            graded_at: HashMap::new(),
            started_at: now,
            completed_at: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn review_state(&self) -> &ReviewState {
        &self.review
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Card being studied, or `None` once complete.
    pub fn current(&self) -> Option<&Flashcard> {
        match self.status {
            SessionStatus::Running { index } => self.queue.get(index),
            SessionStatus::Complete => None,
        }
    }

    pub fn phase(&self, card_id: i64) -> CardPhase {
        self.review.phase(card_id)
    }

    /// Reveal the current card's answer.
    pub fn reveal(&mut self) -> Result<&Flashcard, SessionError> {
        let index = self.running_index()?;
        let card_id = self.card_id_at(index)?;
        self.review.reveal(card_id);
        self.queue.get(index).ok_or(SessionError::Completed)
    }

    /// Grade the current card.
    pub fn grade(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        let index = self.running_index()?;
        self.grade_index(index, outcome, Utc::now())
    }

    /// Re-grade a card already reached in this session. Last grade wins.
    pub fn regrade(&mut self, card_id: i64, outcome: Outcome) -> Result<(), SessionError> {
        self.running_index()?;
        let index = self
            .queue
            .position(card_id)
            .ok_or(SessionError::UnknownCard(card_id))?;
        self.grade_index(index, outcome, Utc::now())
    }

    fn grade_index(
        &mut self,
        index: usize,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let current = self.running_index()?;
        if index > current {
            let card_id = self.card_id_at(index)?;
            return Err(SessionError::NotReached(card_id));
        }
        let card_id = self.card_id_at(index)?;

        let needs_reveal = self.config.reveal_mode == RevealMode::Manual
            && outcome != Outcome::Skipped
            && !self.review.is_revealed(card_id);
        if needs_reveal {
            return Err(SessionError::NotRevealed(card_id));
        }

        scheduler::record_outcome(&mut self.review, card_id, outcome);
        self.graded_at.insert(card_id, now);
        Ok(())
    }

    /// Move past the current card.
    pub fn advance(&mut self) -> Result<SessionStatus, SessionError> {
        let index = self.running_index()?;
        self.status = match scheduler::advance(&self.queue, index) {
            Advance::Next(next) => SessionStatus::Running { index: next },
            Advance::Complete => {
                self.completed_at = Some(Utc::now());
                SessionStatus::Complete
            }
        };
        Ok(self.status)
    }

    pub fn summary(&self) -> SessionSummary {
        self.review.summarize(&self.queue)
    }

    /// Graded cards in queue order, for the stats collaborator.
    pub fn outcomes(&self) -> Vec<OutcomeRecord> {
        self.queue
            .iter()
            .filter_map(|card| {
                let outcome = self.review.outcome(card.id)?;
                let recorded_at = self.graded_at.get(&card.id).copied()?;
                Some(OutcomeRecord {
                    card_id: card.id,
                    outcome,
                    recorded_at,
                })
            })
            .collect()
    }

    fn running_index(&self) -> Result<usize, SessionError> {
        match self.status {
            SessionStatus::Running { index } => Ok(index),
            SessionStatus::Complete => Err(SessionError::Completed),
        }
    }

    fn card_id_at(&self, index: usize) -> Result<i64, SessionError> {
        self.queue
            .get(index)
            .map(|c| c.id)
            .ok_or(SessionError::Completed)
    }
}
