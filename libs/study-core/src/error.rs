//! Error types for study-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a markdown deck file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing question at line {line}")]
    MissingQuestion { line: usize },

    #[error("missing answer at line {line}")]
    MissingAnswer { line: usize },

    #[error("card at line {line} has no area in scope")]
    MissingArea { line: usize },

    #[error("card at line {line} has no theme in scope")]
    MissingTheme { line: usize },

    #[error("invalid ID format at line {line}: {value}")]
    InvalidId { line: usize, value: String },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: i64, line: usize },

    #[error("no ID left to assign to the card at line {line}")]
    IdsExhausted { line: usize },
}

/// Errors raised when a loosely-typed card record fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card record is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("card {id} has a blank `{field}`")]
    BlankField { id: i64, field: &'static str },

    #[error("duplicate card id {id}")]
    DuplicateId { id: i64 },
}

/// Errors from building or driving a study session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no cards match the selected filters")]
    EmptyResult,

    #[error("invalid session config: {0}")]
    InvalidConfig(String),

    #[error("card {0} is not part of this session")]
    UnknownCard(i64),

    #[error("card {0} has not been reached yet")]
    NotReached(i64),

    #[error("card {0} must be revealed before grading")]
    NotRevealed(i64),

    #[error("session is already complete")]
    Completed,
}
