//! Markdown parser for deck files.
//!
//! # Format
//! ```markdown
//! Area: Civil
//! Theme: Contratos
//!
//! ID: 1
//! Q: What makes a contract void?
//! A: Lack of an essential element.
//! E: Capacity, lawful object and prescribed form.
//!
//! Theme: Responsabilidade civil
//! Q: Define strict liability.
//! A: Liability regardless of fault.
//! Multiple lines are supported.
//! ```
//!
//! `Area:` and `Theme:` apply to every card that follows until changed.
//! `ID:` and `E:` are optional.

use crate::error::{ParseError, Result};
use crate::types::Flashcard;
use std::collections::HashSet;

/// Card parsed from a deck file (may not have an ID yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCard {
    pub id: Option<i64>,
    pub area: String,
    pub theme: String,
    pub question: String,
    pub answer: String,
    pub explanation: Option<String>,
    pub line_number: usize,
}

/// Parse markdown deck content into cards.
pub fn parse(content: &str) -> Result<Vec<ParsedCard>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut parser = Parser::new();
    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }
    parser.finish()
}

/// Give cards without an ID fresh ones, counting up from `next_id`
/// or from one past the highest ID present, whichever is larger.
///
/// Fails when the ID space above the highest ID is used up.
pub fn assign_ids(cards: Vec<ParsedCard>, next_id: i64) -> Result<Vec<Flashcard>> {
    let highest = cards.iter().filter_map(|c| c.id).max().unwrap_or(0);
    let mut next = highest.checked_add(1).map(|after| next_id.max(after));

    cards
        .into_iter()
        .map(|card| {
            let id = match card.id {
                Some(id) => id,
                None => {
                    let id = next.ok_or(ParseError::IdsExhausted {
                        line: card.line_number,
                    })?;
                    next = id.checked_add(1);
                    id
                }
            };
            Ok(Flashcard {
                id,
                area: card.area,
                theme: card.theme,
                question: card.question,
                answer: card.answer,
                explanation: card.explanation,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Question,
    Answer,
    Explanation,
}

struct CardBuilder {
    id: Option<i64>,
    area: Option<String>,
    theme: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    explanation: Option<String>,
    start_line: usize,
}

impl CardBuilder {
    fn new(start_line: usize, area: Option<String>, theme: Option<String>) -> Self {
        Self {
            id: None,
            area,
            theme,
            question: None,
            answer: None,
            explanation: None,
            start_line,
        }
    }

    fn build(self) -> Result<ParsedCard> {
        let line = self.start_line;
        let question = self.question.ok_or(ParseError::MissingQuestion { line })?;
        let answer = self.answer.ok_or(ParseError::MissingAnswer { line })?;
        let area = self.area.ok_or(ParseError::MissingArea { line })?;
        let theme = self.theme.ok_or(ParseError::MissingTheme { line })?;

        Ok(ParsedCard {
            id: self.id,
            area,
            theme,
            question: question.trim().to_string(),
            answer: answer.trim().to_string(),
            explanation: self
                .explanation
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            line_number: line,
        })
    }

    fn has_content(&self) -> bool {
        self.question.is_some() || self.answer.is_some() || self.explanation.is_some()
    }
}

struct Parser {
    area: Option<String>,
    theme: Option<String>,
    current: Option<CardBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
    cards: Vec<ParsedCard>,
    seen_ids: HashSet<i64>,
}

impl Parser {
    fn new() -> Self {
        Self {
            area: None,
            theme: None,
            current: None,
            current_field: None,
            buffer: Vec::new(),
            cards: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match Self::parse_line(line) {
            LineType::Area(name) => {
                self.close_card()?;
                self.area = Some(name.to_string());
                self.theme = None;
            }
            LineType::Theme(name) => {
                self.close_card()?;
                self.theme = Some(name.to_string());
            }
            LineType::Id(id_str) => self.handle_id(id_str, line_num)?,
            LineType::Question(text) => self.handle_question(text, line_num)?,
            LineType::Answer(text) => self.start_field(Field::Answer, text),
            LineType::Explanation(text) => self.start_field(Field::Explanation, text),
            LineType::Text(text) => self.buffer.push(text.to_string()),
            LineType::Empty => self.buffer.push(String::new()),
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("Area:") {
            LineType::Area(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("Theme:") {
            LineType::Theme(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("ID:") {
            LineType::Id(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("Q:") {
            LineType::Question(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("A:") {
            LineType::Answer(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("E:") {
            LineType::Explanation(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_id(&mut self, id_str: &str, line_num: usize) -> Result<()> {
        let id = id_str.parse::<i64>().map_err(|_| ParseError::InvalidId {
            line: line_num,
            value: id_str.to_string(),
        })?;

        // An ID line always opens a new card.
        self.close_card()?;
        let mut card = CardBuilder::new(line_num, self.area.clone(), self.theme.clone());
        card.id = Some(id);
        self.current = Some(card);
        Ok(())
    }

    fn handle_question(&mut self, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();

        let starts_new = match &self.current {
            Some(card) => card.has_content(),
            None => true,
        };
        if starts_new {
            self.close_card()?;
            self.current = Some(CardBuilder::new(
                line_num,
                self.area.clone(),
                self.theme.clone(),
            ));
        }

        self.current_field = Some(Field::Question);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn start_field(&mut self, field: Field, text: &str) {
        self.flush_buffer();
        self.current_field = Some(field);
        self.buffer.push(text.to_string());
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut card) = self.current {
            match self.current_field {
                Some(Field::Question) => card.question = Some(content),
                Some(Field::Answer) => card.answer = Some(content),
                Some(Field::Explanation) => card.explanation = Some(content),
                None => {}
            }
        }
    }

    fn close_card(&mut self) -> Result<()> {
        self.flush_buffer();
        self.current_field = None;

        if let Some(card) = self.current.take() {
            let parsed = card.build()?;
            if let Some(id) = parsed.id {
                if !self.seen_ids.insert(id) {
                    return Err(ParseError::DuplicateId {
                        id,
                        line: parsed.line_number,
                    });
                }
            }
            self.cards.push(parsed);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<ParsedCard>> {
        self.close_card()?;
        Ok(self.cards)
    }
}

enum LineType<'a> {
    Area(&'a str),
    Theme(&'a str),
    Id(&'a str),
    Question(&'a str),
    Answer(&'a str),
    Explanation(&'a str),
    Text(&'a str),
    Empty,
}
