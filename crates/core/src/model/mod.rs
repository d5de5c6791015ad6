mod bank;
mod ids;
mod preferences;
mod question;

pub use bank::{BankError, QuestionBank};
pub use ids::QuestionId;
pub use preferences::{
    DEFAULT_COUNT, DEFAULT_TIMER_MINUTES, MAX_TIMER_MINUTES, ParseModeError, Preferences, QuizMode,
};
pub use question::{Level, ParseLevelError, Question, QuestionDraft, QuestionError, QuestionKind};
