//! Areas and themes available for session setup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::types::Flashcard;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSummary {
    pub name: String,
    pub card_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub name: String,
    pub card_count: usize,
    pub themes: Vec<ThemeSummary>,
}

/// Card counts per area and theme, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub total_cards: usize,
    pub areas: Vec<AreaSummary>,
}

impl Catalog {
    /// Build the catalog, counting each card id once.
    pub fn from_cards(cards: &[Flashcard]) -> Self {
        let mut seen = HashSet::new();
        let mut tree: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

        for card in cards.iter().filter(|c| seen.insert(c.id)) {
            *tree
                .entry(card.area.as_str())
                .or_default()
                .entry(card.theme.as_str())
                .or_default() += 1;
        }

        let areas: Vec<AreaSummary> = tree
            .into_iter()
            .map(|(area, themes)| {
                let themes: Vec<ThemeSummary> = themes
                    .into_iter()
                    .map(|(name, card_count)| ThemeSummary {
                        name: name.to_string(),
                        card_count,
                    })
                    .collect();
                AreaSummary {
                    name: area.to_string(),
                    card_count: themes.iter().map(|t| t.card_count).sum(),
                    themes,
                }
            })
            .collect();

        Self {
            total_cards: seen.len(),
            areas,
        }
    }

    pub fn area(&self, name: &str) -> Option<&AreaSummary> {
        self.areas.iter().find(|a| a.name == name)
    }
}
