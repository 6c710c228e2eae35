//! Persistence boundary for players, questions and answer history
//!
//! The quiz service only talks to these traits; the in-memory store is the
//! implementation used by the binary and the tests.

pub mod memory;
pub mod store;

// Re-export commonly used types
pub use memory::InMemoryQuizStore;
pub use store::{
    AnswerHistory, PlayerRepository, QuestionRepository, QuizStore, RatingStore, TopicRepository,
};
