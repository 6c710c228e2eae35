//! Next-question selection
//!
//! Candidates are ranked by how close their rating is to the player's virtual
//! rating. Recently answered questions are skipped, and when everything has
//! been seen recently a question is taken back out of the answer history.

use crate::config::SelectionSettings;
use crate::types::{Question, QuestionId, Rating};
use crate::utils::rating_difference;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A question as seen by the selector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: QuestionId,
    pub rating: Rating,
}

impl From<&Question> for Candidate {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            rating: question.rating,
        }
    }
}

/// Result of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionResult {
    /// Closest-rated candidate outside the repeat window
    Selected(QuestionId),
    /// Every candidate was answered recently; this one comes from the history
    Fallback(QuestionId),
    /// Nothing to offer
    NotFound,
}

impl SelectionResult {
    pub fn question_id(&self) -> Option<QuestionId> {
        match self {
            SelectionResult::Selected(id) | SelectionResult::Fallback(id) => Some(*id),
            SelectionResult::NotFound => None,
        }
    }

    /// Short label used in logs and metric labels
    pub fn label(&self) -> &'static str {
        match self {
            SelectionResult::Selected(_) => "selected",
            SelectionResult::Fallback(_) => "fallback",
            SelectionResult::NotFound => "not_found",
        }
    }
}

/// Stateless question selector
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    repeat_window: usize,
}

impl QuestionSelector {
    pub fn new(repeat_window: usize) -> Self {
        Self { repeat_window }
    }

    pub fn repeat_window(&self) -> usize {
        self.repeat_window
    }

    /// Order candidates by rating distance, closest first. Ties keep their
    /// input order.
    pub fn rank_candidates(&self, virtual_rating: Rating, candidates: &[Candidate]) -> Vec<Candidate> {
        let mut ranked = candidates.to_vec();
        ranked.sort_by(|a, b| {
            rating_difference(a.rating.0, virtual_rating.0)
                .partial_cmp(&rating_difference(b.rating.0, virtual_rating.0))
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }

    /// Pick the next question.
    ///
    /// `recently_answered` is the player's answer history, most recent first.
    /// Only its first `repeat_window` entries block a candidate; when all
    /// candidates are blocked the entry at `candidates.len() - 1` is offered,
    /// or `NotFound` if the history is too short.
    pub fn select(
        &self,
        virtual_rating: Rating,
        candidates: &[Candidate],
        recently_answered: &[QuestionId],
    ) -> SelectionResult {
        if candidates.is_empty() {
            return SelectionResult::NotFound;
        }

        let window = &recently_answered[..self.repeat_window.min(recently_answered.len())];

        if let Some(candidate) = self
            .rank_candidates(virtual_rating, candidates)
            .into_iter()
            .find(|candidate| !window.contains(&candidate.id))
        {
            return SelectionResult::Selected(candidate.id);
        }

        recently_answered
            .get(candidates.len() - 1)
            .map(|id| SelectionResult::Fallback(*id))
            .unwrap_or(SelectionResult::NotFound)
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::from(&SelectionSettings::default())
    }
}

impl From<&SelectionSettings> for QuestionSelector {
    fn from(settings: &SelectionSettings) -> Self {
        Self::new(settings.repeat_window)
    }
}

/// Pick the next question with an explicit repeat window
pub fn select_next_question(
    virtual_rating: Rating,
    candidates: &[Candidate],
    recently_answered: &[QuestionId],
    window_size: usize,
) -> SelectionResult {
    QuestionSelector::new(window_size).select(virtual_rating, candidates, recently_answered)
}
