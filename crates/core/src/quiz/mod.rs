mod controller;
mod filter;
mod keys;
mod score;
mod session;

pub use controller::{FinishReason, Intent, QuizController, QuizState, Screen, Transition};
pub use filter::QuestionFilter;
pub use keys::{MAX_CHOICE_SHORTCUTS, intent_for_key};
pub use score::{ChapterScore, ReviewRow, Score, percentage};
pub use session::{QuizSession, SessionError};
