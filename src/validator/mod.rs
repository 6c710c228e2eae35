//! Answer validation for free-text and numeric questions
//!
//! This module decides whether a submitted string counts as a correct answer,
//! and builds the feedback payload returned for every question kind.

pub mod feedback;
pub mod normalize;

// Re-export commonly used types
pub use feedback::{answer_feedback, AnswerFeedback};

use normalize::{normalize_text, split_number};

/// Type-specific equality check between a stored and a submitted answer
pub trait AnswerValidator: Send + Sync {
    /// Returns true when `submitted` matches `expected`. Malformed input is
    /// simply not a match.
    fn validate(&self, expected: &str, submitted: &str) -> bool;
}

/// Free-text answers: case-insensitive, separator-insensitive
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnswer;

/// Numeric (or hexadecimal-looking) answers compared by normalized digits
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberAnswer;

impl AnswerValidator for TextAnswer {
    fn validate(&self, expected: &str, submitted: &str) -> bool {
        normalize_text(expected) == normalize_text(submitted)
    }
}

impl AnswerValidator for NumberAnswer {
    fn validate(&self, expected: &str, submitted: &str) -> bool {
        if submitted.trim().is_empty() {
            return false;
        }

        match (split_number(expected), split_number(submitted)) {
            (Some(expected), Some(submitted)) => expected == submitted,
            _ => false,
        }
    }
}

/// Compare a free-text answer
pub fn validate_text(expected: &str, submitted: &str) -> bool {
    TextAnswer.validate(expected, submitted)
}

/// Compare a numeric answer
pub fn validate_number(expected: &str, submitted: &str) -> bool {
    NumberAnswer.validate(expected, submitted)
}
