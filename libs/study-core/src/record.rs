//! Validation of loosely-typed card records.
//!
//! Card data arriving from a content API or a database row is accepted as a
//! [`RawFlashcard`] with every field optional, then checked into a
//! [`Flashcard`] before it reaches the scheduler.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CardError;
use crate::types::Flashcard;

/// Unvalidated card record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFlashcard {
    pub id: Option<i64>,
    pub area: Option<String>,
    pub theme: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

impl TryFrom<RawFlashcard> for Flashcard {
    type Error = CardError;

    fn try_from(raw: RawFlashcard) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(CardError::MissingField { field: "id" })?;

        Ok(Flashcard {
            id,
            area: required(id, "area", raw.area)?,
            theme: required(id, "theme", raw.theme)?,
            question: required(id, "question", raw.question)?,
            answer: required(id, "answer", raw.answer)?,
            explanation: raw
                .explanation
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        })
    }
}

fn required(id: i64, field: &'static str, value: Option<String>) -> Result<String, CardError> {
    let value = value.ok_or(CardError::MissingField { field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CardError::BlankField { id, field });
    }
    Ok(trimmed.to_string())
}

/// Validate a batch of records, rejecting duplicate ids.
pub fn validate_cards(
    raw: impl IntoIterator<Item = RawFlashcard>,
) -> Result<Vec<Flashcard>, CardError> {
    let mut seen = HashSet::new();
    let mut cards = Vec::new();

    for record in raw {
        let card = Flashcard::try_from(record)?;
        if !seen.insert(card.id) {
            return Err(CardError::DuplicateId { id: card.id });
        }
        cards.push(card);
    }

    Ok(cards)
}
