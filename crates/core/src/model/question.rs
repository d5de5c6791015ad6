use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has no choices")]
    NoChoices,

    #[error("answerIndex {index} is out of range for {len} choices")]
    AnswerOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown level: {0}")]
pub struct ParseLevelError(pub String);

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty of a question, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "débutant")]
    Beginner,
    #[serde(rename = "intermédiaire")]
    Intermediate,
    #[serde(rename = "avancé")]
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Wire value, as found in bank files and the results CSV.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "débutant",
            Level::Intermediate => "intermédiaire",
            Level::Advanced => "avancé",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Level::Beginner => "Débutant",
            Level::Intermediate => "Intermédiaire",
            Level::Advanced => "Avancé",
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only multiple-choice questions exist today; the tag is kept on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[default]
    #[serde(rename = "mcq")]
    Mcq,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question, shaped exactly like a record in a bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub chapitre: String,
    pub niveau: Level,
    pub question: String,
    pub choices: Vec<String>,
    #[serde(rename = "answerIndex")]
    pub answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl QuestionDraft {
    /// Check the question invariants and build a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or text is blank, there are no
    /// choices, or `answer_index` does not point at a choice.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.id.is_blank() {
            return Err(QuestionError::EmptyId);
        }
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.choices.is_empty() {
            return Err(QuestionError::NoChoices);
        }
        if self.answer_index >= self.choices.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: self.answer_index,
                len: self.choices.len(),
            });
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Question {
            id: self.id,
            kind: self.kind,
            chapter: self.chapitre.trim().to_string(),
            level: self.niveau,
            text: self.question,
            choices: self.choices,
            answer_index: self.answer_index,
            explanation,
            sources: self.sources,
        })
    }
}

/// A validated multiple-choice question.
///
/// `answer_index` always points at an entry of `choices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", into = "QuestionDraft")]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    chapter: String,
    level: Level,
    text: String,
    choices: Vec<String>,
    answer_index: usize,
    explanation: Option<String>,
    sources: Vec<String>,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Question> for QuestionDraft {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            kind: question.kind,
            chapitre: question.chapter,
            niveau: question.level,
            question: question.text,
            choices: question.choices,
            answer_index: question.answer_index,
            explanation: question.explanation,
            sources: question.sources,
        }
    }
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.answer_index]
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new("q1"),
            kind: QuestionKind::Mcq,
            chapitre: "Réseaux".into(),
            niveau: Level::Beginner,
            question: "Port HTTPS ?".into(),
            choices: vec!["80".into(), "443".into()],
            answer_index: 1,
            explanation: Some("  TLS  ".into()),
            sources: vec!["RFC 2818".into()],
        }
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let mut bad = draft();
        bad.answer_index = 2;
        assert_eq!(
            bad.validate(),
            Err(QuestionError::AnswerOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn validate_trims_explanation() {
        let question = draft().validate().unwrap();
        assert_eq!(question.explanation(), Some("TLS"));
        assert_eq!(question.correct_choice(), "443");
        assert!(question.is_correct(1));
    }

    #[test]
    fn deserializes_bank_record_with_wire_names() {
        let json = r#"{
            "id": 3,
            "type": "mcq",
            "chapitre": "Cryptographie",
            "niveau": "avancé",
            "question": "AES est ?",
            "choices": ["symétrique", "asymétrique"],
            "answerIndex": 0
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.id().as_str(), "3");
        assert_eq!(question.level(), Level::Advanced);
        assert!(question.sources().is_empty());
        assert_eq!(question.explanation(), None);
    }

    #[test]
    fn deserialize_enforces_invariant() {
        let json = r#"{"id":"x","type":"mcq","chapitre":"c","niveau":"débutant",
            "question":"?","choices":["a"],"answerIndex":4}"#;
        let err = serde_json::from_str::<Question>(json).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }

    #[test]
    fn level_parses_wire_values() {
        assert_eq!("intermédiaire".parse::<Level>(), Ok(Level::Intermediate));
        assert!("expert".parse::<Level>().is_err());
        assert!(Level::Beginner < Level::Advanced);
    }
}
