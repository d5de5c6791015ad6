use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{Preferences, Question, QuestionBank, QuestionId, QuizMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions match the selected chapter and level")]
    NoMatchingQuestions,

    #[error("choice {choice} does not exist (question has {len} choices)")]
    InvalidChoice { choice: usize, len: usize },

    #[error("no quiz is in progress")]
    NotInQuiz,

    #[error("a quiz is already in progress")]
    AlreadyRunning,
}

/// A running quiz: the selected questions, the visiting order, the cursor and
/// the answers given so far.
///
/// `idx` always points inside `order`, and `answers` only holds ids of
/// questions in this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    order: Vec<usize>,
    idx: usize,
    answers: HashMap<QuestionId, usize>,
    mode: QuizMode,
    started_at: DateTime<Utc>,
    time_limit: Option<u32>,
    time_left: Option<u32>,
}

impl QuizSession {
    /// Select questions from `bank` according to `prefs` and start a session.
    ///
    /// The filtered set is shuffled when `prefs.randomize` is set, then
    /// truncated to the configured count clamped to `[1, bank.len()]`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoMatchingQuestions` when the filter selects nothing.
    pub fn build<R: Rng + ?Sized>(
        bank: &QuestionBank,
        prefs: &Preferences,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let mut selected: Vec<Question> =
            prefs.filter().apply(bank).into_iter().cloned().collect();
        if selected.is_empty() {
            return Err(SessionError::NoMatchingQuestions);
        }

        if prefs.randomize {
            selected.shuffle(rng);
        }
        selected.truncate(prefs.effective_count(bank.len()));

        Self::new(selected, prefs.mode, prefs.timer_secs(), started_at)
    }

    /// Start a session over exactly `questions`, visited in the given order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoMatchingQuestions` if `questions` is empty.
    pub fn new(
        questions: Vec<Question>,
        mode: QuizMode,
        time_limit: Option<u32>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoMatchingQuestions);
        }
        let order = (0..questions.len()).collect();
        Ok(Self {
            questions,
            order,
            idx: 0,
            answers: HashMap::new(),
            mode,
            started_at,
            time_limit,
            time_left: time_limit,
        })
    }

    /// Same questions, fresh answers and timer. The visiting order is
    /// reshuffled when `shuffle` is set.
    #[must_use]
    pub fn restarted<R: Rng + ?Sized>(
        &self,
        shuffle: bool,
        rng: &mut R,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut order: Vec<usize> = (0..self.questions.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }
        Self {
            questions: self.questions.clone(),
            order,
            idx: 0,
            answers: HashMap::new(),
            mode: self.mode,
            started_at,
            time_limit: self.time_limit,
            time_left: self.time_limit,
        }
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Sessions are never empty; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.idx
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.idx == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.idx + 1 >= self.order.len()
    }

    #[must_use]
    pub fn current(&self) -> &Question {
        &self.questions[self.order[self.idx]]
    }

    /// Questions in visiting order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.order.iter().map(|&i| &self.questions[i])
    }

    #[must_use]
    pub fn answer_for(&self, id: &QuestionId) -> Option<usize> {
        self.answers.get(id).copied()
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answer_for(self.current().id())
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.len().saturating_sub(self.answers.len())
    }

    /// Record `choice` for the current question, replacing any earlier answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidChoice` if the question has no such choice.
    pub fn record_answer(&mut self, choice: usize) -> Result<(), SessionError> {
        let question = self.current();
        let len = question.choices().len();
        if choice >= len {
            return Err(SessionError::InvalidChoice { choice, len });
        }
        let id = question.id().clone();
        self.answers.insert(id, choice);
        Ok(())
    }

    /// Move to the next question. Returns `false` when already on the last one.
    pub fn step_forward(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.idx += 1;
        true
    }

    /// Move to the previous question. Returns `false` when already on the first one.
    pub fn step_back(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.idx -= 1;
        true
    }

    pub fn jump_to(&mut self, position: usize) {
        self.idx = position.min(self.order.len() - 1);
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.time_limit.is_some()
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    #[must_use]
    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    /// Count the timer down by `secs`. Returns `true` once it has run out.
    /// Untimed sessions never run out.
    pub fn tick(&mut self, secs: u32) -> bool {
        match self.time_left.as_mut() {
            Some(left) => {
                *left = left.saturating_sub(secs);
                *left == 0
            }
            None => false,
        }
    }
}
