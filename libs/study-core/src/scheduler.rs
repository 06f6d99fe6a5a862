//! Study session scheduler: builds the bounded card queue for a session
//! and sequences delivery of its cards.
//!
//! Filtering keeps repository order. For `Ordering::Random` the queue is a
//! uniform sample without replacement, drawn in random order, so every card
//! matching the filters is equally likely to appear regardless of its
//! position in the repository.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SessionError;
use crate::review::ReviewState;
use crate::types::{Flashcard, Ordering, Outcome, SessionConfig};

/// Ordered, duplicate-free cards for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionQueue {
    cards: Vec<Flashcard>,
}

impl SessionQueue {
    pub(crate) fn from_cards(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Flashcard> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flashcard> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Queue position of a card.
    pub fn position(&self, card_id: i64) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    pub fn contains(&self, card_id: i64) -> bool {
        self.position(card_id).is_some()
    }
}

/// Result of stepping past the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Advance {
    Next(usize),
    Complete,
}

/// Build a session queue using the thread-local RNG for random ordering.
pub fn build_queue(
    all_cards: &[Flashcard],
    config: &SessionConfig,
) -> Result<SessionQueue, SessionError> {
    build_queue_with_rng(all_cards, config, &mut rand::rng())
}

/// Build a session queue with an explicit RNG.
pub fn build_queue_with_rng<R: Rng + ?Sized>(
    all_cards: &[Flashcard],
    config: &SessionConfig,
    rng: &mut R,
) -> Result<SessionQueue, SessionError> {
    config.validate()?;

    let filtered = filter_cards(all_cards, config);
    if filtered.is_empty() {
        return Err(SessionError::EmptyResult);
    }

    let take = (config.card_count as usize).min(filtered.len());
    let cards = match config.ordering {
        Ordering::Sequential => filtered.into_iter().take(take).cloned().collect(),
        Ordering::Random => index::sample(rng, filtered.len(), take)
            .into_iter()
            .map(|i| filtered[i].clone())
            .collect(),
    };

    Ok(SessionQueue::from_cards(cards))
}

/// Number of distinct cards passing the config's filters.
pub fn count_matching(all_cards: &[Flashcard], config: &SessionConfig) -> usize {
    filter_cards(all_cards, config).len()
}

/// Step from `current_index` to the next card. No wraparound.
pub fn advance(queue: &SessionQueue, current_index: usize) -> Advance {
    match current_index.checked_add(1) {
        Some(next) if next < queue.len() => Advance::Next(next),
        _ => Advance::Complete,
    }
}

/// Record a graded outcome for a card; the last call for a card wins.
pub fn record_outcome(review_state: &mut ReviewState, card_id: i64, outcome: Outcome) {
    review_state.record_outcome(card_id, outcome);
}

// First occurrence of an id wins.
fn filter_cards<'a>(all_cards: &'a [Flashcard], config: &SessionConfig) -> Vec<&'a Flashcard> {
    let mut seen = HashSet::new();
    all_cards
        .iter()
        .filter(|card| config.matches(card))
        .filter(|card| seen.insert(card.id))
        .collect()
}
