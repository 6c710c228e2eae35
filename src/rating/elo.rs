//! Elo rating engine for players answering questions
//!
//! A player and a question are treated as two sides of a match: the player
//! "wins" by answering correctly. Win probability comes from the skillratings
//! Elo implementation; each side has its own K factor.

use crate::config::RatingSettings;
use crate::error::QuizError;
use crate::rating::calculator::{HistoricalAnswer, RatingCalculator, RatingUpdate};
use crate::types::Rating;
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};
use tracing::debug;

/// Configuration for the Elo rating engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloEngineConfig {
    /// Maximum rating change for a player per answer
    pub player_k_factor: f64,
    /// Maximum rating change for a question per answer
    pub question_k_factor: f64,
    /// Players at or above this rating are not penalized for wrong answers
    pub rating_cap: f64,
    /// Initial rating for new players
    pub initial_player_rating: f64,
    /// Rating of a difficulty-0 question
    pub question_rating_base: f64,
    /// Rating added per difficulty level
    pub question_rating_step: f64,
    /// Highest accepted difficulty level
    pub max_difficulty: u8,
}

impl Default for EloEngineConfig {
    fn default() -> Self {
        Self {
            player_k_factor: 32.0,
            question_k_factor: 32.0,
            rating_cap: 1500.0,
            initial_player_rating: 1000.0,
            question_rating_base: 800.0,
            question_rating_step: 100.0,
            max_difficulty: 5,
        }
    }
}

impl From<&RatingSettings> for EloEngineConfig {
    fn from(settings: &RatingSettings) -> Self {
        Self {
            player_k_factor: settings.player_k_factor,
            question_k_factor: settings.question_k_factor,
            rating_cap: settings.rating_cap,
            initial_player_rating: settings.initial_player_rating,
            question_rating_base: settings.question_rating_base,
            question_rating_step: settings.question_rating_step,
            max_difficulty: settings.max_difficulty,
        }
    }
}

impl EloEngineConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.player_k_factor > 0.0 && self.player_k_factor.is_finite()) {
            return Err(QuizError::ConfigurationError {
                message: "Player K factor must be positive".to_string(),
            }
            .into());
        }

        if !(self.question_k_factor > 0.0 && self.question_k_factor.is_finite()) {
            return Err(QuizError::ConfigurationError {
                message: "Question K factor must be positive".to_string(),
            }
            .into());
        }

        let ratings = [
            self.rating_cap,
            self.initial_player_rating,
            self.question_rating_base,
            self.question_rating_step,
        ];
        if ratings.iter().any(|value| !value.is_finite()) {
            return Err(QuizError::ConfigurationError {
                message: "Rating parameters must be finite".to_string(),
            }
            .into());
        }

        if self.max_difficulty == 0 {
            return Err(QuizError::ConfigurationError {
                message: "Max difficulty must be at least 1".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Elo rating calculator with a mastery cap
#[derive(Debug, Clone)]
pub struct EloRatingCalculator {
    config: EloEngineConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo rating calculator
    pub fn new(config: EloEngineConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// Probability that the player answers the question correctly
    pub fn expected_score(&self, player: Rating, question: Rating) -> f64 {
        let (player_expected, _) =
            expected_score(&EloRating::from(player), &EloRating::from(question));
        player_expected
    }

    /// Rating change for the player, `K_player * (result - E)`
    pub fn player_delta(&self, player: Rating, question: Rating, correct: bool) -> f64 {
        let expected = self.expected_score(player, question);
        self.config.player_k_factor * (score(correct) - expected)
    }

    /// Rating change for the question, mirrored from the question's side:
    /// `K_question * ((1 - result) - (1 - E))`
    pub fn question_delta(&self, player: Rating, question: Rating, correct: bool) -> f64 {
        let expected = self.expected_score(player, question);
        self.config.question_k_factor * ((1.0 - score(correct)) - (1.0 - expected))
    }

    /// True when the cap rule suppresses this update entirely
    pub fn is_capped(&self, player: Rating, correct: bool) -> bool {
        !correct && player.0 >= self.config.rating_cap
    }

    pub fn engine_config(&self) -> &EloEngineConfig {
        &self.config
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn update(&self, player: Rating, question: Rating, correct: bool) -> RatingUpdate {
        if self.is_capped(player, correct) {
            debug!(
                "Rating update suppressed: player rating {} is at or above cap {}",
                player, self.config.rating_cap
            );
            return RatingUpdate::unchanged(player, question);
        }

        RatingUpdate {
            old_player_rating: player,
            new_player_rating: Rating(player.0 + self.player_delta(player, question, correct)),
            old_question_rating: question,
            new_question_rating: Rating(
                question.0 + self.question_delta(player, question, correct),
            ),
            updated: true,
        }
    }

    /// Each replayed answer's expectation is measured against the stored
    /// rating, so deltas are additive and the replay order does not matter.
    fn virtual_rating(&self, player: Rating, history: &[HistoricalAnswer]) -> Rating {
        let virtual_rating = history.iter().fold(player.0, |running, answer| {
            running + self.player_delta(player, answer.question_rating, answer.result)
        });
        Rating(virtual_rating)
    }

    fn initial_player_rating(&self) -> Rating {
        Rating(self.config.initial_player_rating)
    }

    fn initial_question_rating(&self, difficulty: u8) -> crate::error::Result<Rating> {
        if difficulty == 0 || difficulty > self.config.max_difficulty {
            return Err(QuizError::InvalidQuestion {
                reason: format!(
                    "Difficulty must be between 1 and {}, got {}",
                    self.config.max_difficulty, difficulty
                ),
            }
            .into());
        }

        Ok(Rating(
            self.config.question_rating_base
                + self.config.question_rating_step * f64::from(difficulty),
        ))
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let new_config: EloEngineConfig =
            serde_json::from_value(config).map_err(|e| QuizError::ConfigurationError {
                message: format!("Invalid Elo configuration: {}", e),
            })?;

        new_config.validate()?;
        self.config = new_config;
        Ok(())
    }
}

fn score(correct: bool) -> f64 {
    if correct {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> EloRatingCalculator {
        EloRatingCalculator::new(EloEngineConfig::default()).unwrap()
    }

    fn answer(question_rating: f64, result: bool) -> HistoricalAnswer {
        HistoricalAnswer {
            question_rating: Rating(question_rating),
            result,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = EloEngineConfig::default();
        assert!(config.validate().is_ok());

        config.player_k_factor = 0.0;
        assert!(config.validate().is_err());

        config = EloEngineConfig::default();
        config.question_k_factor = -1.0;
        assert!(config.validate().is_err());

        config = EloEngineConfig::default();
        config.rating_cap = f64::NAN;
        assert!(config.validate().is_err());

        config = EloEngineConfig::default();
        config.max_difficulty = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expected_score() {
        let calculator = calculator();

        assert_eq!(calculator.expected_score(Rating(1000.0), Rating(1000.0)), 0.5);
        assert!(calculator.expected_score(Rating(1400.0), Rating(1000.0)) > 0.9);
        assert!(calculator.expected_score(Rating(1000.0), Rating(1400.0)) < 0.1);
    }

    #[test]
    fn test_equal_ratings_correct_answer() {
        let calculator = calculator();
        let update = calculator.update(Rating(1000.0), Rating(1000.0), true);

        assert!(update.updated);
        assert_eq!(update.new_player_rating, Rating(1016.0));
        assert_eq!(update.new_question_rating, Rating(984.0));
    }

    #[test]
    fn test_rating_change_on_correct() {
        let update = calculator().update(Rating(1000.0), Rating(1000.0), true);

        assert!(update.new_player_rating.0 > 1000.0);
        assert!(update.new_question_rating.0 < 1000.0);
    }

    #[test]
    fn test_rating_change_on_incorrect() {
        let update = calculator().update(Rating(1000.0), Rating(1000.0), false);

        assert!(update.new_player_rating.0 < 1000.0);
        assert!(update.new_question_rating.0 > 1000.0);
    }

    #[test]
    fn test_no_rating_change_above_cap() {
        let calculator = calculator();

        let update = calculator.update(Rating(1500.0), Rating(1000.0), false);
        assert!(!update.updated);
        assert_eq!(update.new_player_rating, Rating(1500.0));
        assert_eq!(update.new_question_rating, Rating(1000.0));

        // Correct answers above the cap still count
        let update = calculator.update(Rating(1500.0), Rating(1000.0), true);
        assert!(update.updated);
        assert!(update.new_player_rating.0 > 1500.0);
    }

    #[test]
    fn test_zero_delta_is_still_an_update() {
        let calculator = calculator();
        // Hopeless question: the correct-answer gain is tiny but applied
        let update = calculator.update(Rating(3000.0), Rating(0.0), true);
        assert!(update.updated);
    }

    #[test]
    fn test_virtual_rating_without_history() {
        let rating = calculator().virtual_rating(Rating(1000.0), &[]);
        assert_eq!(rating, Rating(1000.0));
    }

    #[test]
    fn test_virtual_rating_increase() {
        let rating = calculator().virtual_rating(Rating(1000.0), &[answer(1000.0, true)]);
        assert!(rating.0 > 1000.0);
    }

    #[test]
    fn test_virtual_rating_decrease() {
        let rating = calculator().virtual_rating(Rating(1000.0), &[answer(1000.0, false)]);
        assert!(rating.0 < 1000.0);
    }

    #[test]
    fn test_virtual_rating_increase_and_decrease() {
        let calculator = calculator();
        let history = [answer(1000.0, true), answer(1000.0, false)];

        assert_eq!(calculator.virtual_rating(Rating(1000.0), &history), Rating(1000.0));

        let reversed = [answer(1000.0, false), answer(1000.0, true)];
        assert_eq!(calculator.virtual_rating(Rating(1000.0), &reversed), Rating(1000.0));
    }

    #[test]
    fn test_virtual_rating_does_not_apply_cap() {
        let rating = calculator().virtual_rating(Rating(1600.0), &[answer(1600.0, false)]);
        assert!(rating.0 < 1600.0);
    }

    #[test]
    fn test_initial_question_rating() {
        let calculator = calculator();

        assert_eq!(calculator.initial_question_rating(1).unwrap(), Rating(900.0));
        assert_eq!(calculator.initial_question_rating(5).unwrap(), Rating(1300.0));
        assert!(calculator.initial_question_rating(0).is_err());
        assert!(calculator.initial_question_rating(6).is_err());
    }

    #[test]
    fn test_config_round_trip_through_json() {
        let mut calculator = calculator();

        let mut json = calculator.config();
        json["rating_cap"] = serde_json::json!(1800.0);
        calculator.update_config(json).unwrap();
        assert_eq!(calculator.engine_config().rating_cap, 1800.0);

        let invalid = serde_json::json!({ "player_k_factor": "fast" });
        assert!(calculator.update_config(invalid).is_err());
    }
}
