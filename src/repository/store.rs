//! Repository interfaces the quiz engine depends on
//!
//! These traits are the persistence boundary. Implementations must make
//! `RatingStore::apply_answer` a single serialized read-modify-write per
//! player and per question; the rating engine itself does no locking.

use crate::error::Result;
use crate::rating::RatingUpdate;
use crate::types::{
    Player, PlayerAnswer, PlayerId, Question, QuestionId, QuestionReport, Rating, Topic, TopicId,
};

/// Questions and their current ratings
pub trait QuestionRepository: Send + Sync {
    /// Get a question of any kind by id
    fn get_question(&self, id: QuestionId) -> Result<Option<Question>>;

    /// Store or replace a question
    fn store_question(&self, question: Question) -> Result<()>;

    /// All questions whose topic is in `topics`, ordered by id
    fn questions_in_topics(&self, topics: &[TopicId]) -> Result<Vec<Question>>;

    /// Smallest id greater than every stored question id
    fn next_question_id(&self) -> Result<QuestionId>;
}

/// Topics grouped by subject
pub trait TopicRepository: Send + Sync {
    fn store_topic(&self, topic: Topic) -> Result<()>;

    fn get_topic(&self, title: &str) -> Result<Option<Topic>>;

    /// Topics belonging to a subject, ordered by title
    fn topics_for_subject(&self, subject: &str) -> Result<Vec<Topic>>;
}

/// Players and their topic selection
pub trait PlayerRepository: Send + Sync {
    fn get_player(&self, id: &PlayerId) -> Result<Option<Player>>;

    fn store_player(&self, player: Player) -> Result<()>;

    /// All players, ordered by id
    fn all_players(&self) -> Result<Vec<Player>>;

    fn selected_topics(&self, id: &PlayerId) -> Result<Vec<TopicId>>;

    /// Replace the player's topic selection
    fn set_selected_topics(&self, id: &PlayerId, topics: Vec<TopicId>) -> Result<()>;
}

/// Append-only answer history and question reports
pub trait AnswerHistory: Send + Sync {
    /// Append an answer without touching any rating
    fn record_answer(&self, answer: PlayerAnswer) -> Result<()>;

    /// Up to `limit` of the player's answers, most recent first, optionally
    /// restricted to the given topics
    fn most_recent(
        &self,
        player_id: &PlayerId,
        topics: Option<&[TopicId]>,
        limit: usize,
    ) -> Result<Vec<PlayerAnswer>>;

    fn record_report(&self, report: QuestionReport) -> Result<()>;

    fn reports_for_question(&self, question_id: QuestionId) -> Result<Vec<QuestionReport>>;
}

/// Atomic rating updates
pub trait RatingStore: Send + Sync {
    /// Read the current player and question ratings, compute the update,
    /// persist both new ratings and append `answer`, all as one unit.
    fn apply_answer(
        &self,
        answer: PlayerAnswer,
        update: &dyn Fn(Rating, Rating) -> RatingUpdate,
    ) -> Result<RatingUpdate>;
}

/// Everything the quiz service needs from persistence
pub trait QuizStore:
    QuestionRepository + TopicRepository + PlayerRepository + AnswerHistory + RatingStore
{
}

impl<T> QuizStore for T where
    T: QuestionRepository + TopicRepository + PlayerRepository + AnswerHistory + RatingStore
{
}
