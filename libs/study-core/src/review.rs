//! Per-card review state for one session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::scheduler::SessionQueue;
use crate::types::{CardPhase, Outcome, SessionSummary};

/// Reveal flag and graded outcome of a single card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl ReviewEntry {
    pub fn phase(&self) -> CardPhase {
        match (self.revealed, self.outcome) {
            (_, Some(_)) => CardPhase::Graded,
            (true, None) => CardPhase::Revealed,
            (false, None) => CardPhase::Unrevealed,
        }
    }
}

/// Mapping from card id to its review entry.
///
/// Cards without an entry are unrevealed and ungraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    entries: HashMap<i64, ReviewEntry>,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a card as revealed. Keeps any outcome already recorded.
    pub fn reveal(&mut self, card_id: i64) {
        self.entries.entry(card_id).or_default().revealed = true;
    }

    /// Record a graded outcome. A later call for the same card replaces it.
    pub fn record_outcome(&mut self, card_id: i64, outcome: Outcome) {
        self.entries.insert(
            card_id,
            ReviewEntry {
                revealed: true,
                outcome: Some(outcome),
            },
        );
    }

    pub fn entry(&self, card_id: i64) -> ReviewEntry {
        self.entries.get(&card_id).copied().unwrap_or_default()
    }

    pub fn phase(&self, card_id: i64) -> CardPhase {
        self.entry(card_id).phase()
    }

    pub fn outcome(&self, card_id: i64) -> Option<Outcome> {
        self.entry(card_id).outcome
    }

    pub fn is_revealed(&self, card_id: i64) -> bool {
        self.entry(card_id).revealed
    }

    /// Count outcomes over the cards of a queue.
    pub fn summarize(&self, queue: &SessionQueue) -> SessionSummary {
        let mut summary = SessionSummary {
            total: queue.len(),
            correct: 0,
            incorrect: 0,
            skipped: 0,
            ungraded: 0,
            accuracy: None,
        };

        for card in queue.iter() {
            match self.outcome(card.id) {
                Some(Outcome::Correct) => summary.correct += 1,
                Some(Outcome::Incorrect) => summary.incorrect += 1,
                Some(Outcome::Skipped) => summary.skipped += 1,
                None => summary.ungraded += 1,
            }
        }

        let answered = summary.correct + summary.incorrect;
        if answered > 0 {
            summary.accuracy = Some(summary.correct as f64 / answered as f64);
        }
        summary
    }
}
