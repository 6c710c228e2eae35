//! Rating calculator trait and shared result types
//!
//! A calculator owns the rating policy: how one answer moves a player and a
//! question, and how a player's history is replayed into a virtual rating.

use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Outcome of applying one answer to a player/question pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub old_player_rating: Rating,
    pub new_player_rating: Rating,
    pub old_question_rating: Rating,
    pub new_question_rating: Rating,
    /// False when the update was suppressed (ratings left untouched)
    pub updated: bool,
}

impl RatingUpdate {
    /// A suppressed update: both ratings stay as they were
    pub fn unchanged(player: Rating, question: Rating) -> Self {
        Self {
            old_player_rating: player,
            new_player_rating: player,
            old_question_rating: question,
            new_question_rating: question,
            updated: false,
        }
    }

    pub fn player_delta(&self) -> f64 {
        self.new_player_rating.0 - self.old_player_rating.0
    }

    pub fn question_delta(&self) -> f64 {
        self.new_question_rating.0 - self.old_question_rating.0
    }
}

/// One past answer as seen by the virtual rating replay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalAnswer {
    /// Current rating of the answered question
    pub question_rating: Rating,
    pub result: bool,
}

/// Trait for rating policies
pub trait RatingCalculator: Send + Sync {
    /// Compute new ratings for a player and a question after one answer
    fn update(&self, player: Rating, question: Rating, correct: bool) -> RatingUpdate;

    /// Replay past answers on top of the stored rating without persisting
    /// anything. `history` is in chronological order.
    fn virtual_rating(&self, player: Rating, history: &[HistoricalAnswer]) -> Rating;

    /// Rating given to newly registered players
    fn initial_player_rating(&self) -> Rating;

    /// Rating given to a new question of the given difficulty level
    fn initial_question_rating(&self, difficulty: u8) -> crate::error::Result<Rating>;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_update() {
        let update = RatingUpdate::unchanged(Rating(1500.0), Rating(1000.0));

        assert!(!update.updated);
        assert_eq!(update.player_delta(), 0.0);
        assert_eq!(update.question_delta(), 0.0);
        assert_eq!(update.new_player_rating, Rating(1500.0));
    }

    #[test]
    fn test_deltas() {
        let update = RatingUpdate {
            old_player_rating: Rating(1000.0),
            new_player_rating: Rating(1016.0),
            old_question_rating: Rating(1000.0),
            new_question_rating: Rating(984.0),
            updated: true,
        };

        assert_eq!(update.player_delta(), 16.0);
        assert_eq!(update.question_delta(), -16.0);
    }
}
