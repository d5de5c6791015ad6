use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Level, Question};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

/// Ordered collection of questions, replaced wholesale on import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Question>", into = "Vec<Question>")]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateId` if two questions share an id, since
    /// answers are keyed by id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateId(question.id().clone()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct chapter names, sorted, for the filter panel.
    #[must_use]
    pub fn chapters(&self) -> Vec<&str> {
        self.questions
            .iter()
            .map(Question::chapter)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Levels that occur at least once, easiest first.
    #[must_use]
    pub fn levels(&self) -> Vec<Level> {
        self.questions
            .iter()
            .map(Question::level)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl TryFrom<Vec<Question>> for QuestionBank {
    type Error = BankError;

    fn try_from(questions: Vec<Question>) -> Result<Self, Self::Error> {
        Self::new(questions)
    }
}

impl From<QuestionBank> for Vec<Question> {
    fn from(bank: QuestionBank) -> Self {
        bank.questions
    }
}
