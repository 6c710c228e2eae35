//! Common types used throughout the quiz engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloRating;
use uuid::Uuid;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for questions
pub type QuestionId = u64;

/// Unique identifier for multiple-choice options
pub type ChoiceId = u64;

/// Topics are keyed by their title
pub type TopicId = String;

/// Unique identifier for question reports
pub type ReportId = Uuid;

/// Skill (players) or difficulty (questions) on a shared Elo scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(pub f64);

impl Rating {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(1000.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl From<Rating> for EloRating {
    fn from(rating: Rating) -> Self {
        Self { rating: rating.0 }
    }
}

impl From<EloRating> for Rating {
    fn from(rating: EloRating) -> Self {
        Self(rating.rating)
    }
}

/// A quiz participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
}

/// Grouping key for questions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    pub title: TopicId,
    pub subject: String,
}

/// One option of a multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

/// Type-specific payload of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    TrueFalse { answer: bool },
    MultipleChoice { choices: Vec<Choice> },
    Text { answer: String },
    Number { answer: String },
}

impl QuestionKind {
    /// Short label used in logs and metric labels
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::TrueFalse { .. } => "true_false",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::Text { .. } => "text",
            QuestionKind::Number { .. } => "number",
        }
    }
}

/// A question together with its difficulty rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic: TopicId,
    pub text: String,
    pub rating: Rating,
    pub kind: QuestionKind,
}

/// Append-only record of a player answering a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAnswer {
    pub player_id: PlayerId,
    pub question_id: QuestionId,
    pub topic: TopicId,
    pub result: bool,
    /// Recorded because the player reported the question rather than answering it
    #[serde(default)]
    pub report_skip: bool,
    pub answered_at: DateTime<Utc>,
}

/// Problems a player can flag on a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFlags {
    /// The answer marked as correct is wrong
    pub red_right: bool,
    /// The player's answer was marked wrong but is right
    pub green_wrong: bool,
    pub unclear: bool,
    pub off_topic: bool,
    pub inappropriate: bool,
    pub other: bool,
}

/// A player's report on a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReport {
    pub id: ReportId,
    pub player_id: PlayerId,
    pub question_id: QuestionId,
    pub flags: ReportFlags,
    pub comment: String,
    pub reported_at: DateTime<Utc>,
}
