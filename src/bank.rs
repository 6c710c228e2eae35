//! TOML question banks
//!
//! A bank lists topics and questions:
//!
//! ```toml
//! [[topics]]
//! title = "fractions"
//! subject = "math"
//!
//! [[questions]]
//! topic = "fractions"
//! text = "What is 1/2 as a decimal?"
//! difficulty = 2
//! kind = { type = "number", answer = "0.5" }
//! ```

use crate::error::Result;
use crate::service::{NewQuestion, QuizService};
use crate::types::Topic;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Topics and questions loaded from a bank file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionBank {
    pub topics: Vec<Topic>,
    pub questions: Vec<NewQuestion>,
}

/// Counts of what a bank added to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankSummary {
    pub topics: usize,
    pub questions: usize,
}

impl QuestionBank {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load question bank {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Add every topic, then every question, through the service's validation
    pub fn load_into(&self, service: &QuizService) -> Result<BankSummary> {
        for topic in &self.topics {
            service.add_topic(&topic.title, &topic.subject)?;
        }

        for (index, question) in self.questions.iter().enumerate() {
            service
                .create_question(question.clone())
                .with_context(|| format!("Invalid question #{} in bank", index + 1))?;
        }

        let summary = BankSummary {
            topics: self.topics.len(),
            questions: self.questions.len(),
        };
        info!(
            "Loaded question bank: {} topic(s), {} question(s)",
            summary.topics, summary.questions
        );
        Ok(summary)
    }
}
