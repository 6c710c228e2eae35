//! Rating engine for players and questions
//!
//! This module provides the Elo-derived update applied after every answer,
//! the mastery cap, and the virtual rating used to rank candidate questions.

pub mod calculator;
pub mod elo;

// Re-export commonly used types
pub use calculator::{HistoricalAnswer, RatingCalculator, RatingUpdate};
pub use elo::{EloEngineConfig, EloRatingCalculator};
