//! Feedback returned to the player after answering a question

use crate::types::{ChoiceId, Question, QuestionKind};
use crate::validator::{validate_number, validate_text};
use serde::{Deserialize, Serialize};

/// What the player answered, what was correct, and whether they matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    /// The submitted answer as received
    pub answer: String,
    /// Correct answer(s); choice ids for multiple-choice questions
    pub correct: Vec<String>,
    pub answered_correct: bool,
}

/// Score a raw submission against a question of any kind
pub fn answer_feedback(question: &Question, raw: &str) -> AnswerFeedback {
    let (correct, answered_correct) = match &question.kind {
        QuestionKind::TrueFalse { answer } => {
            let submitted = match raw.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            };
            (vec![answer.to_string()], submitted == Some(*answer))
        }
        QuestionKind::MultipleChoice { choices } => {
            let correct_ids: Vec<ChoiceId> = choices
                .iter()
                .filter(|choice| choice.correct)
                .map(|choice| choice.id)
                .collect();
            let answered_correct = raw
                .trim()
                .parse::<ChoiceId>()
                .map(|id| correct_ids.contains(&id))
                .unwrap_or(false);
            (
                correct_ids.iter().map(ToString::to_string).collect(),
                answered_correct,
            )
        }
        QuestionKind::Text { answer } => (vec![answer.clone()], validate_text(answer, raw)),
        QuestionKind::Number { answer } => (vec![answer.clone()], validate_number(answer, raw)),
    };

    AnswerFeedback {
        answer: raw.to_string(),
        correct,
        answered_correct,
    }
}
