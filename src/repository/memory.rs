//! In-memory implementation of the quiz repositories
//!
//! All state sits behind one `RwLock`, so `apply_answer` holds the write lock
//! for the whole read-modify-write of both ratings.

use crate::error::{QuizError, Result};
use crate::rating::RatingUpdate;
use crate::repository::store::{
    AnswerHistory, PlayerRepository, QuestionRepository, RatingStore, TopicRepository,
};
use crate::types::{
    Player, PlayerAnswer, PlayerId, Question, QuestionId, QuestionReport, Rating, Topic, TopicId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct StoreState {
    players: BTreeMap<PlayerId, Player>,
    selected_topics: HashMap<PlayerId, Vec<TopicId>>,
    topics: BTreeMap<TopicId, Topic>,
    questions: BTreeMap<QuestionId, Question>,
    /// Per player, ordered by `answered_at` then insertion
    answers: HashMap<PlayerId, Vec<PlayerAnswer>>,
    reports: Vec<QuestionReport>,
}

/// In-memory quiz store
#[derive(Debug, Default)]
pub struct InMemoryQuizStore {
    state: RwLock<StoreState>,
}

impl InMemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| {
            QuizError::InternalError {
                message: "Failed to acquire store read lock".to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| {
            QuizError::InternalError {
                message: "Failed to acquire store write lock".to_string(),
            }
            .into()
        })
    }
}

fn append_answer(state: &mut StoreState, answer: PlayerAnswer) {
    let history = state.answers.entry(answer.player_id.clone()).or_default();
    let position = history.partition_point(|existing| existing.answered_at <= answer.answered_at);
    history.insert(position, answer);
}

impl QuestionRepository for InMemoryQuizStore {
    fn get_question(&self, id: QuestionId) -> Result<Option<Question>> {
        Ok(self.read()?.questions.get(&id).cloned())
    }

    fn store_question(&self, question: Question) -> Result<()> {
        self.write()?.questions.insert(question.id, question);
        Ok(())
    }

    fn questions_in_topics(&self, topics: &[TopicId]) -> Result<Vec<Question>> {
        let state = self.read()?;
        Ok(state
            .questions
            .values()
            .filter(|question| topics.contains(&question.topic))
            .cloned()
            .collect())
    }

    fn next_question_id(&self) -> Result<QuestionId> {
        let state = self.read()?;
        Ok(state
            .questions
            .keys()
            .next_back()
            .map(|id| id + 1)
            .unwrap_or(1))
    }
}

impl TopicRepository for InMemoryQuizStore {
    fn store_topic(&self, topic: Topic) -> Result<()> {
        self.write()?.topics.insert(topic.title.clone(), topic);
        Ok(())
    }

    fn get_topic(&self, title: &str) -> Result<Option<Topic>> {
        Ok(self.read()?.topics.get(title).cloned())
    }

    fn topics_for_subject(&self, subject: &str) -> Result<Vec<Topic>> {
        let state = self.read()?;
        Ok(state
            .topics
            .values()
            .filter(|topic| topic.subject == subject)
            .cloned()
            .collect())
    }
}

impl PlayerRepository for InMemoryQuizStore {
    fn get_player(&self, id: &PlayerId) -> Result<Option<Player>> {
        Ok(self.read()?.players.get(id).cloned())
    }

    fn store_player(&self, player: Player) -> Result<()> {
        self.write()?.players.insert(player.id.clone(), player);
        Ok(())
    }

    fn all_players(&self) -> Result<Vec<Player>> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    fn selected_topics(&self, id: &PlayerId) -> Result<Vec<TopicId>> {
        Ok(self
            .read()?
            .selected_topics
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn set_selected_topics(&self, id: &PlayerId, topics: Vec<TopicId>) -> Result<()> {
        self.write()?.selected_topics.insert(id.clone(), topics);
        Ok(())
    }
}

impl AnswerHistory for InMemoryQuizStore {
    fn record_answer(&self, answer: PlayerAnswer) -> Result<()> {
        let mut state = self.write()?;
        append_answer(&mut state, answer);
        Ok(())
    }

    fn most_recent(
        &self,
        player_id: &PlayerId,
        topics: Option<&[TopicId]>,
        limit: usize,
    ) -> Result<Vec<PlayerAnswer>> {
        let state = self.read()?;
        let Some(history) = state.answers.get(player_id) else {
            return Ok(Vec::new());
        };

        Ok(history
            .iter()
            .rev()
            .filter(|answer| topics.map_or(true, |topics| topics.contains(&answer.topic)))
            .take(limit)
            .cloned()
            .collect())
    }

    fn record_report(&self, report: QuestionReport) -> Result<()> {
        self.write()?.reports.push(report);
        Ok(())
    }

    fn reports_for_question(&self, question_id: QuestionId) -> Result<Vec<QuestionReport>> {
        let state = self.read()?;
        Ok(state
            .reports
            .iter()
            .filter(|report| report.question_id == question_id)
            .cloned()
            .collect())
    }
}

impl RatingStore for InMemoryQuizStore {
    fn apply_answer(
        &self,
        answer: PlayerAnswer,
        update: &dyn Fn(Rating, Rating) -> RatingUpdate,
    ) -> Result<RatingUpdate> {
        let mut state = self.write()?;

        let player_rating = state
            .players
            .get(&answer.player_id)
            .map(|player| player.rating)
            .ok_or_else(|| QuizError::PlayerNotFound {
                player_id: answer.player_id.clone(),
            })?;
        let question_rating = state
            .questions
            .get(&answer.question_id)
            .map(|question| question.rating)
            .ok_or(QuizError::QuestionNotFound {
                question_id: answer.question_id,
            })?;

        let result = update(player_rating, question_rating);

        if result.updated {
            if let Some(player) = state.players.get_mut(&answer.player_id) {
                player.rating = result.new_player_rating;
            }
            if let Some(question) = state.questions.get_mut(&answer.question_id) {
                question.rating = result.new_question_rating;
            }
        }

        append_answer(&mut state, answer);
        Ok(result)
    }
}
