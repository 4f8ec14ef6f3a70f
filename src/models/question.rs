//! Question supplied by the question bank.

use serde::{Deserialize, Serialize};

/// A single multiple-choice question.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the right answer.
    pub answer_index: usize,
}

impl Question {
    pub fn new(
        category: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
    ) -> Self {
        Self {
            category: category.into(),
            prompt: prompt.into(),
            options,
            answer_index,
        }
    }

    /// Whether `choice` is the right option. Out-of-range choices are simply wrong.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}
