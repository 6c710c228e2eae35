//! Quiz orchestration
//!
//! `QuizService` scores submissions, moves player and question ratings through
//! the store's atomic update, and picks the next question from the player's
//! virtual rating and answer history.

use crate::config::{validate_config, AppConfig};
use crate::error::{QuizError, Result};
use crate::metrics::MetricsCollector;
use crate::rating::{
    EloEngineConfig, EloRatingCalculator, HistoricalAnswer, RatingCalculator, RatingUpdate,
};
use crate::repository::{InMemoryQuizStore, QuizStore};
use crate::selection::{reportable_questions, Candidate, QuestionSelector, SelectionResult};
use crate::types::{
    ChoiceId, Player, PlayerAnswer, Question, QuestionId, QuestionKind, QuestionReport, Rating,
    ReportFlags, Topic, TopicId,
};
use crate::utils::{current_timestamp, generate_report_id};
use crate::validator::normalize::split_number;
use crate::validator::{answer_feedback, AnswerFeedback};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request to add a question to the bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Explicit id, or `None` to take the next free one
    pub id: Option<QuestionId>,
    pub topic: TopicId,
    pub text: String,
    pub difficulty: u8,
    pub kind: QuestionKind,
}

/// Result of submitting an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub feedback: AnswerFeedback,
    pub rating_update: RatingUpdate,
}

/// The next question for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOffer {
    pub question: Question,
    pub selection: SelectionResult,
    pub virtual_rating: Rating,
    /// Recently answered questions the player may still report
    pub recent_questions: Vec<Question>,
}

/// Virtual rating of a player within one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRating {
    pub topic: TopicId,
    pub rating: Rating,
}

/// Per-subject statistics for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject: String,
    /// Answers given in the subject's topics, report-skips excluded
    pub answers: usize,
    pub ratings: Vec<TopicRating>,
}

/// Main quiz service
#[derive(Clone)]
pub struct QuizService {
    store: Arc<dyn QuizStore>,
    calculator: Arc<dyn RatingCalculator>,
    selector: QuestionSelector,
    metrics: Arc<MetricsCollector>,
    virtual_rating_window: usize,
    reportable_amount: usize,
}

impl QuizService {
    /// Create a service over an existing store
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn QuizStore>,
        metrics: Arc<MetricsCollector>,
    ) -> Result<Self> {
        validate_config(config)?;
        let calculator = EloRatingCalculator::new(EloEngineConfig::from(&config.rating))?;

        Ok(Self {
            store,
            calculator: Arc::new(calculator),
            selector: QuestionSelector::from(&config.selection),
            metrics,
            virtual_rating_window: config.rating.virtual_rating_window,
            reportable_amount: config.selection.reportable_amount,
        })
    }

    /// Create a service backed by a fresh in-memory store
    pub fn in_memory(config: &AppConfig) -> Result<Self> {
        Self::new(
            config,
            Arc::new(InMemoryQuizStore::new()),
            Arc::new(MetricsCollector::new()?),
        )
    }

    pub fn store(&self) -> &Arc<dyn QuizStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn calculator(&self) -> &Arc<dyn RatingCalculator> {
        &self.calculator
    }

    /// Register a player with the initial rating. Registering an existing
    /// player returns it unchanged.
    pub fn register_player(&self, player_id: &str) -> Result<Player> {
        if let Some(existing) = self.store.get_player(&player_id.to_string())? {
            return Ok(existing);
        }

        let player = Player {
            id: player_id.to_string(),
            rating: self.calculator.initial_player_rating(),
            created_at: current_timestamp(),
        };
        self.store.store_player(player.clone())?;

        info!("Registered player '{}' with rating {}", player.id, player.rating);
        Ok(player)
    }

    pub fn player(&self, player_id: &str) -> Result<Player> {
        self.store
            .get_player(&player_id.to_string())?
            .ok_or_else(|| {
                QuizError::PlayerNotFound {
                    player_id: player_id.to_string(),
                }
                .into()
            })
    }

    pub fn question(&self, question_id: QuestionId) -> Result<Question> {
        self.store.get_question(question_id)?.ok_or_else(|| {
            QuizError::QuestionNotFound { question_id }.into()
        })
    }

    pub fn add_topic(&self, title: &str, subject: &str) -> Result<Topic> {
        if title.trim().is_empty() || subject.trim().is_empty() {
            return Err(QuizError::InvalidTopicSelection {
                reason: "Topic title and subject cannot be empty".to_string(),
            }
            .into());
        }

        let topic = Topic {
            title: title.to_string(),
            subject: subject.to_string(),
        };
        self.store.store_topic(topic.clone())?;

        debug!("Added topic '{}' to subject '{}'", topic.title, topic.subject);
        Ok(topic)
    }

    /// Validate and store a new question, rated from its difficulty
    pub fn create_question(&self, new_question: NewQuestion) -> Result<Question> {
        if new_question.text.trim().is_empty() {
            return Err(QuizError::InvalidQuestion {
                reason: "Question text cannot be empty".to_string(),
            }
            .into());
        }

        if self.store.get_topic(&new_question.topic)?.is_none() {
            return Err(QuizError::TopicNotFound {
                title: new_question.topic,
            }
            .into());
        }

        validate_kind(&new_question.kind)?;
        let rating = self
            .calculator
            .initial_question_rating(new_question.difficulty)?;

        let id = match new_question.id {
            Some(id) => {
                if self.store.get_question(id)?.is_some() {
                    return Err(QuizError::InvalidQuestion {
                        reason: format!("Question {} already exists", id),
                    }
                    .into());
                }
                id
            }
            None => self.store.next_question_id()?,
        };

        let question = Question {
            id,
            topic: new_question.topic,
            text: new_question.text,
            rating,
            kind: new_question.kind,
        };
        self.store.store_question(question.clone())?;

        info!(
            "Created {} question {} in topic '{}' with rating {}",
            question.kind.label(),
            question.id,
            question.topic,
            question.rating
        );
        Ok(question)
    }

    /// Replace the player's topic selection.
    ///
    /// An empty `titles` list selects every topic of `subject`. Titles that
    /// are not topics of `subject` are skipped. A rejected request still
    /// clears the old selection.
    pub fn select_topics(
        &self,
        player_id: &str,
        subject: &str,
        titles: &[String],
    ) -> Result<Vec<TopicId>> {
        let player = self.player(player_id)?;

        // The previous selection is dropped even when the request is rejected
        self.store.set_selected_topics(&player.id, Vec::new())?;

        if subject.trim().is_empty() {
            return Err(QuizError::InvalidTopicSelection {
                reason: "No subject given".to_string(),
            }
            .into());
        }

        let subject_topics: Vec<TopicId> = self
            .store
            .topics_for_subject(subject)?
            .into_iter()
            .map(|topic| topic.title)
            .collect();

        let selected: Vec<TopicId> = if titles.is_empty() {
            subject_topics
        } else {
            let mut seen = HashSet::new();
            titles
                .iter()
                .filter(|title| {
                    let known = subject_topics.contains(*title);
                    if !known {
                        warn!(
                            "Skipping unknown topic '{}' for subject '{}'",
                            title, subject
                        );
                    }
                    known && seen.insert(title.as_str())
                })
                .cloned()
                .collect()
        };

        self.store
            .set_selected_topics(&player.id, selected.clone())?;

        info!(
            "Player '{}' selected {} topic(s) in subject '{}'",
            player.id,
            selected.len(),
            subject
        );
        Ok(selected)
    }

    /// Score a submission and apply the rating update atomically
    pub fn submit_answer(
        &self,
        player_id: &str,
        question_id: QuestionId,
        raw: &str,
    ) -> Result<AnswerOutcome> {
        let timer = self.metrics.start_timer();
        let question = self.question(question_id)?;

        let feedback = answer_feedback(&question, raw);
        let correct = feedback.answered_correct;

        let answer = PlayerAnswer {
            player_id: player_id.to_string(),
            question_id,
            topic: question.topic.clone(),
            result: correct,
            report_skip: false,
            answered_at: current_timestamp(),
        };

        let calculator = &self.calculator;
        let rating_update = self.store.apply_answer(
            answer,
            &|player_rating: Rating, question_rating: Rating| {
                calculator.update(player_rating, question_rating, correct)
            },
        )?;

        self.metrics.record_answer(question.kind.label(), correct);
        self.metrics
            .record_rating_update(&rating_update, timer.stop());

        info!(
            "Player '{}' answered question {} {}: rating {} -> {}, question {} -> {}",
            player_id,
            question_id,
            if correct { "correctly" } else { "incorrectly" },
            rating_update.old_player_rating,
            rating_update.new_player_rating,
            rating_update.old_question_rating,
            rating_update.new_question_rating
        );

        Ok(AnswerOutcome {
            feedback,
            rating_update,
        })
    }

    /// Stored rating plus the replay of recent in-topic answers
    pub fn virtual_rating(&self, player_id: &str, topics: &[TopicId]) -> Result<Rating> {
        let player = self.player(player_id)?;
        let answered = self.answered_questions(&player, topics)?;
        Ok(self.replay(&player, &answered))
    }

    /// Pick the next question for a player from their selected topics
    pub fn next_question(&self, player_id: &str) -> Result<QuestionOffer> {
        let timer = self.metrics.start_timer();
        let player = self.player(player_id)?;

        let topics = self.store.selected_topics(&player.id)?;
        if topics.is_empty() {
            return Err(QuizError::NoTopicsSelected {
                player_id: player.id,
            }
            .into());
        }

        let questions = self.store.questions_in_topics(&topics)?;
        if questions.is_empty() {
            return Err(QuizError::NoQuestionsAvailable {
                player_id: player.id,
            }
            .into());
        }

        let answered = self.answered_questions(&player, &topics)?;
        let virtual_rating = self.replay(&player, &answered);

        let candidates: Vec<Candidate> = questions.iter().map(Candidate::from).collect();
        let history_limit = self.selector.repeat_window().max(candidates.len());
        let recently_answered: Vec<QuestionId> = self
            .store
            .most_recent(&player.id, None, history_limit)?
            .into_iter()
            .map(|answer| answer.question_id)
            .collect();

        let selection = self
            .selector
            .select(virtual_rating, &candidates, &recently_answered);
        self.metrics.record_selection(&selection, timer.stop());

        let question = match selection.question_id() {
            Some(id) => self.question(id)?,
            None => {
                return Err(QuizError::NoQuestionsAvailable {
                    player_id: player.id,
                }
                .into())
            }
        };

        debug!(
            "Offering question {} ({}) to player '{}' at virtual rating {}",
            question.id,
            selection.label(),
            player.id,
            virtual_rating
        );

        let recent: Vec<Question> = answered.into_iter().map(|(_, question)| question).collect();
        let recent_questions = reportable_questions(&recent, &question, self.reportable_amount);

        Ok(QuestionOffer {
            question,
            selection,
            virtual_rating,
            recent_questions,
        })
    }

    /// Store a report and record the question as skipped
    pub fn report_question(
        &self,
        player_id: &str,
        question_id: QuestionId,
        flags: ReportFlags,
        comment: &str,
    ) -> Result<QuestionReport> {
        let player = self.player(player_id)?;
        let question = self.question(question_id)?;

        let report = QuestionReport {
            id: generate_report_id(),
            player_id: player.id.clone(),
            question_id,
            flags,
            comment: comment.to_string(),
            reported_at: current_timestamp(),
        };
        self.store.record_report(report.clone())?;

        self.store.record_answer(PlayerAnswer {
            player_id: player.id,
            question_id,
            topic: question.topic,
            result: true,
            report_skip: true,
            answered_at: report.reported_at,
        })?;
        self.metrics.record_report();

        info!(
            "Player '{}' reported question {} (report {})",
            report.player_id, question_id, report.id
        );
        Ok(report)
    }

    /// Virtual rating per topic; an empty list means the player's selection
    pub fn rating_list(&self, player_id: &str, topics: &[TopicId]) -> Result<Vec<TopicRating>> {
        let player = self.player(player_id)?;
        let topics = if topics.is_empty() {
            self.store.selected_topics(&player.id)?
        } else {
            topics.to_vec()
        };

        topics
            .into_iter()
            .map(|topic| -> Result<TopicRating> {
                let answered = self.answered_questions(&player, std::slice::from_ref(&topic))?;
                Ok(TopicRating {
                    rating: self.replay(&player, &answered),
                    topic,
                })
            })
            .collect()
    }

    /// Answer count and per-topic virtual ratings for every topic of a subject
    pub fn rating_list_for_subject(&self, player_id: &str, subject: &str) -> Result<SubjectStats> {
        let player = self.player(player_id)?;
        let topics: Vec<TopicId> = self
            .store
            .topics_for_subject(subject)?
            .into_iter()
            .map(|topic| topic.title)
            .collect();

        let answers = if topics.is_empty() {
            0
        } else {
            self.store
                .most_recent(&player.id, Some(&topics[..]), usize::MAX)?
                .iter()
                .filter(|answer| !answer.report_skip)
                .count()
        };

        let ratings = if topics.is_empty() {
            Vec::new()
        } else {
            self.rating_list(&player.id, &topics)?
        };

        Ok(SubjectStats {
            subject: subject.to_string(),
            answers,
            ratings,
        })
    }

    /// Recent in-topic answers that were not report-skips, most recent first,
    /// paired with the current state of the answered question
    fn answered_questions(
        &self,
        player: &Player,
        topics: &[TopicId],
    ) -> Result<Vec<(bool, Question)>> {
        let mut answered = Vec::new();
        for answer in self
            .store
            .most_recent(&player.id, Some(topics), self.virtual_rating_window)?
        {
            if answer.report_skip {
                continue;
            }
            match self.store.get_question(answer.question_id)? {
                Some(question) => answered.push((answer.result, question)),
                None => warn!(
                    "Answer history of '{}' refers to missing question {}",
                    player.id, answer.question_id
                ),
            }
        }
        Ok(answered)
    }

    fn replay(&self, player: &Player, answered: &[(bool, Question)]) -> Rating {
        let history: Vec<HistoricalAnswer> = answered
            .iter()
            .rev()
            .map(|(result, question)| HistoricalAnswer {
                question_rating: question.rating,
                result: *result,
            })
            .collect();
        self.calculator.virtual_rating(player.rating, &history)
    }
}

fn validate_kind(kind: &QuestionKind) -> Result<()> {
    let problem = match kind {
        QuestionKind::TrueFalse { .. } => None,
        QuestionKind::MultipleChoice { choices } => {
            let correct = choices.iter().filter(|choice| choice.correct).count();
            let unique: HashSet<ChoiceId> = choices.iter().map(|choice| choice.id).collect();
            if choices.len() < 2 {
                Some("Multiple-choice questions need at least two choices".to_string())
            } else if correct != 1 {
                Some(format!(
                    "Multiple-choice questions need exactly one correct choice, got {}",
                    correct
                ))
            } else if unique.len() != choices.len() {
                Some("Choice ids must be unique".to_string())
            } else {
                None
            }
        }
        QuestionKind::Text { answer } => answer
            .trim()
            .is_empty()
            .then(|| "Text answer cannot be empty".to_string()),
        QuestionKind::Number { answer } => {
            if answer.trim().is_empty() {
                Some("Number answer cannot be empty".to_string())
            } else if split_number(answer).is_none() {
                Some(format!("Number answer '{}' has more than one decimal mark", answer))
            } else {
                None
            }
        }
    };

    match problem {
        Some(reason) => Err(QuizError::InvalidQuestion { reason }.into()),
        None => Ok(()),
    }
}
