use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::bank::QuestionBank;
use crate::model::question::Level;
use crate::quiz::QuestionFilter;

pub const DEFAULT_COUNT: usize = 10;
pub const DEFAULT_TIMER_MINUTES: u32 = 10;
pub const MAX_TIMER_MINUTES: u32 = 180;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown quiz mode: {0}")]
pub struct ParseModeError(pub String);

/// How feedback is shown while a quiz runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// Correctness, explanation and sources appear as soon as a choice is made.
    #[default]
    Training,
    /// Feedback is held back until the results screen.
    Exam,
}

impl QuizMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            QuizMode::Training => "training",
            QuizMode::Exam => "exam",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            QuizMode::Training => "Entraînement",
            QuizMode::Exam => "Examen",
        }
    }

    #[must_use]
    pub const fn reveals_immediately(self) -> bool {
        matches!(self, QuizMode::Training)
    }
}

impl FromStr for QuizMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "training" => Ok(QuizMode::Training),
            "exam" => Ok(QuizMode::Exam),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session parameters chosen on the home screen and persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub mode: QuizMode,
    pub randomize: bool,
    pub timer_enabled: bool,
    pub timer_minutes: u32,
    pub chapter: Option<String>,
    pub level: Option<Level>,
    pub count: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mode: QuizMode::default(),
            randomize: true,
            timer_enabled: false,
            timer_minutes: DEFAULT_TIMER_MINUTES,
            chapter: None,
            level: None,
            count: DEFAULT_COUNT,
        }
    }
}

impl Preferences {
    #[must_use]
    pub fn filter(&self) -> QuestionFilter {
        QuestionFilter {
            chapter: self.chapter.clone(),
            level: self.level,
        }
    }

    /// Count actually used for a bank of `bank_size` questions: `[1, bank_size]`.
    #[must_use]
    pub fn effective_count(&self, bank_size: usize) -> usize {
        self.count.clamp(1, bank_size.max(1))
    }

    /// True when the chapter filter names a chapter `bank` does not contain.
    /// Such a filter matches nothing and has no option in the chapter picker.
    #[must_use]
    pub fn has_unknown_chapter(&self, bank: &QuestionBank) -> bool {
        self.chapter
            .as_deref()
            .is_some_and(|chapter| !bank.chapters().contains(&chapter))
    }

    /// Countdown length in seconds, or `None` for an untimed session.
    #[must_use]
    pub fn timer_secs(&self) -> Option<u32> {
        self.timer_enabled
            .then(|| self.timer_minutes.clamp(1, MAX_TIMER_MINUTES) * 60)
    }
}
