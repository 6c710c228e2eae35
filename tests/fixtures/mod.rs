//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use adaptive_quiz::config::AppConfig;
use adaptive_quiz::service::{NewQuestion, QuizService};
use adaptive_quiz::types::{Question, QuestionKind, Rating};

/// Service with two math topics and one language topic
pub fn create_test_service() -> QuizService {
    let service = QuizService::in_memory(&AppConfig::default()).expect("service");
    service.add_topic("fractions", "math").expect("topic");
    service.add_topic("geometry", "math").expect("topic");
    service.add_topic("verbs", "language").expect("topic");
    service
}

/// Register a player and select every topic of `subject`
pub fn create_test_player(service: &QuizService, id: &str, subject: &str) {
    service.register_player(id).expect("player");
    service.select_topics(id, subject, &[]).expect("topics");
}

/// Add a text question whose answer is `answer`
pub fn add_text_question(
    service: &QuizService,
    topic: &str,
    difficulty: u8,
    answer: &str,
) -> Question {
    service
        .create_question(NewQuestion {
            id: None,
            topic: topic.to_string(),
            text: format!("Spell '{}'", answer),
            difficulty,
            kind: QuestionKind::Text {
                answer: answer.to_string(),
            },
        })
        .expect("question")
}

/// Add text questions and force their ratings
pub fn add_rated_questions(service: &QuizService, topic: &str, ratings: &[f64]) -> Vec<Question> {
    ratings
        .iter()
        .enumerate()
        .map(|(index, rating)| {
            let mut question = add_text_question(service, topic, 2, &format!("word{}", index));
            question.rating = Rating(*rating);
            service
                .store()
                .store_question(question.clone())
                .expect("store question");
            question
        })
        .collect()
}

/// Overwrite a player's stored rating
pub fn set_player_rating(service: &QuizService, id: &str, rating: f64) {
    let mut player = service.player(id).expect("player");
    player.rating = Rating(rating);
    service.store().store_player(player).expect("store player");
}
