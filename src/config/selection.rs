//! Question selection configuration

use serde::{Deserialize, Serialize};

/// Settings for choosing the next question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Most recently answered questions that are not offered again
    pub repeat_window: usize,
    /// Recently answered questions listed as reportable next to a new question
    pub reportable_amount: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            repeat_window: 5,
            reportable_amount: 2,
        }
    }
}
