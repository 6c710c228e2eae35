//! Error types for the quiz engine
//!
//! The scoring, rating and selection functions never fail; the errors here
//! belong to the orchestration layer and the repositories it talks to.

use crate::types::{PlayerId, QuestionId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific quiz scenarios
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("Question not found: {question_id}")]
    QuestionNotFound { question_id: QuestionId },

    #[error("Topic not found: {title}")]
    TopicNotFound { title: String },

    #[error("Player {player_id} has not selected any topics")]
    NoTopicsSelected { player_id: PlayerId },

    #[error("Invalid topic selection: {reason}")]
    InvalidTopicSelection { reason: String },

    #[error("No questions available for player {player_id}")]
    NoQuestionsAvailable { player_id: PlayerId },

    #[error("Invalid question: {reason}")]
    InvalidQuestion { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
