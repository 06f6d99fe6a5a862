//! Test fixtures and factory functions for creating test data.

use serde_json::json;
use study_core::Flashcard;

/// Create a card with generated question and answer text.
pub fn card(id: i64, area: &str, theme: &str) -> Flashcard {
    Flashcard {
        id,
        area: area.to_string(),
        theme: theme.to_string(),
        question: format!("Question {}?", id),
        answer: format!("Answer {}.", id),
        explanation: Some(format!("Explanation {}.", id)),
    }
}

/// Ten cards alternating between the Civil and Penal areas.
///
/// Odd ids are Civil/Contratos, even ids are Penal/Crimes.
pub fn legal_cards() -> Vec<Flashcard> {
    (1..=10)
        .map(|id| {
            if id % 2 == 1 {
                card(id, "Civil", "Contratos")
            } else {
                card(id, "Penal", "Crimes")
            }
        })
        .collect()
}

/// Create a session config request body.
pub fn session_config(areas: &[&str], card_count: u32, ordering: &str) -> serde_json::Value {
    json!({
        "selected_areas": areas,
        "card_count": card_count,
        "ordering": ordering,
    })
}

/// Create a grade request body.
pub fn grade_request(outcome: &str, card_id: Option<i64>) -> serde_json::Value {
    match card_id {
        Some(id) => json!({ "outcome": outcome, "card_id": id }),
        None => json!({ "outcome": outcome }),
    }
}
