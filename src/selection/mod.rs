//! Question selection
//!
//! Picks the next question for a player from a ranked candidate list, with
//! anti-repetition and a deterministic fallback.

pub mod reportable;
pub mod selector;

// Re-export commonly used types
pub use reportable::reportable_questions;
pub use selector::{select_next_question, Candidate, QuestionSelector, SelectionResult};
