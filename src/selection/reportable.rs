//! Recently answered questions offered for reporting next to a new question

use crate::types::Question;
use std::collections::HashSet;

/// Pick up to `limit` distinct recent questions, skipping the one on offer.
///
/// `recent` must be ordered most recent first. Questions are de-duplicated by
/// their text.
pub fn reportable_questions(recent: &[Question], offered: &Question, limit: usize) -> Vec<Question> {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(offered.text.as_str());

    recent
        .iter()
        .filter(|question| seen.insert(question.text.as_str()))
        .take(limit)
        .cloned()
        .collect()
}
