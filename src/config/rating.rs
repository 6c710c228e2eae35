//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Rating policy constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Rating given to newly registered players
    pub initial_player_rating: f64,
    /// K factor applied to player rating changes
    pub player_k_factor: f64,
    /// K factor applied to question rating changes
    pub question_k_factor: f64,
    /// Players at or above this rating lose nothing on a wrong answer
    pub rating_cap: f64,
    /// Number of most recent in-topic answers replayed for the virtual rating
    pub virtual_rating_window: usize,
    /// Rating of a difficulty-0 question
    pub question_rating_base: f64,
    /// Rating added per difficulty level
    pub question_rating_step: f64,
    /// Highest accepted difficulty level
    pub max_difficulty: u8,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_player_rating: 1000.0,
            player_k_factor: 32.0,
            question_k_factor: 32.0,
            rating_cap: 1500.0,
            virtual_rating_window: 50,
            question_rating_base: 800.0,
            question_rating_step: 100.0,
            max_difficulty: 5,
        }
    }
}
