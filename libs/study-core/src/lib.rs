//! Core study-session library shared by the backend and any client.
//!
//! Provides:
//! - Shared types (Flashcard, SessionConfig, Outcome, etc.)
//! - Session queue building and card sequencing
//! - Per-card review state and session summaries
//! - Markdown deck parser and validation of loose card records
//! - Area/theme catalog for session setup

pub mod catalog;
pub mod error;
pub mod parser;
pub mod record;
pub mod review;
pub mod scheduler;
pub mod session;
pub mod types;

pub use catalog::{AreaSummary, Catalog, ThemeSummary};
pub use error::{CardError, ParseError, Result, SessionError};
pub use parser::{assign_ids, parse, ParsedCard};
pub use record::{validate_cards, RawFlashcard};
pub use review::{ReviewEntry, ReviewState};
pub use scheduler::{
    advance, build_queue, build_queue_with_rng, count_matching, record_outcome, Advance,
    SessionQueue,
};
pub use session::{SessionStatus, StudySession};
pub use types::{
    CardPhase, Flashcard, Ordering, Outcome, OutcomeRecord, RevealMode, SessionConfig,
    SessionSummary,
};
