//! Adaptive Quiz - Elo-rated question selection engine
//!
//! This crate scores quiz answers, keeps player and question ratings on a
//! shared Elo scale, and picks each player's next question by rating distance
//! with an anti-repetition window.

pub mod bank;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod repository;
pub mod selection;
pub mod service;
pub mod types;
pub mod utils;
pub mod validator;

// Re-export commonly used types and traits
pub use error::{QuizError, Result};
pub use types::*;

// Re-export key components
pub use rating::{EloRatingCalculator, RatingCalculator, RatingUpdate};
pub use selection::{select_next_question, QuestionSelector, SelectionResult};
pub use service::QuizService;
pub use validator::{validate_number, validate_text};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
