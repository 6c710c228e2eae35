//! Service layer for the adaptive quiz engine
//!
//! This module contains the quiz service that coordinates the store, the
//! rating calculator, the question selector and metrics.

pub mod quiz;

pub use quiz::{AnswerOutcome, NewQuestion, QuestionOffer, QuizService, SubjectStats, TopicRating};
