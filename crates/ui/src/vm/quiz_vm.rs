use quiz_core::model::Question;
use quiz_core::quiz::{MAX_CHOICE_SHORTCUTS, QuizSession};

use crate::vm::time_fmt::format_countdown;

/// Seconds under which the countdown is highlighted.
const LOW_TIME_SECS: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoiceVerdict {
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub index: usize,
    pub shortcut: Option<usize>,
    pub text: String,
    pub selected: bool,
    /// Only set once the answer may be revealed.
    pub verdict: Option<ChoiceVerdict>,
}

impl ChoiceVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match (self.verdict, self.selected) {
            (Some(ChoiceVerdict::Correct), _) => "choice choice--correct",
            (Some(ChoiceVerdict::Wrong), _) => "choice choice--wrong",
            (None, true) => "choice choice--selected",
            (None, false) => "choice",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub correct_choice: String,
    pub explanation: Option<String>,
    pub sources: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteItemVm {
    pub position: usize,
    pub label: String,
    pub answered: bool,
    pub current: bool,
}

impl PaletteItemVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match (self.current, self.answered) {
            (true, _) => "palette__item palette__item--current",
            (false, true) => "palette__item palette__item--answered",
            (false, false) => "palette__item",
        }
    }
}

/// Snapshot of the running session for the quiz screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub progress_label: String,
    pub answered_label: String,
    pub chapter: String,
    pub level_label: &'static str,
    pub mode_label: &'static str,
    pub question: String,
    pub choices: Vec<ChoiceVm>,
    pub feedback: Option<FeedbackVm>,
    pub palette: Vec<PaletteItemVm>,
    pub timer_label: Option<String>,
    pub time_low: bool,
    pub is_first: bool,
    pub is_last: bool,
    /// Unanswered count while the finish prompt is open.
    pub confirm_unanswered: Option<usize>,
}

impl QuizVm {
    #[must_use]
    pub fn new(session: &QuizSession, pending_finish: Option<usize>) -> Self {
        let question = session.current();
        let chosen = session.current_answer();
        let reveal = session.mode().reveals_immediately() && chosen.is_some();

        let choices = question
            .choices()
            .iter()
            .enumerate()
            .map(|(index, text)| ChoiceVm {
                index,
                shortcut: (index < MAX_CHOICE_SHORTCUTS).then_some(index + 1),
                text: text.clone(),
                selected: chosen == Some(index),
                verdict: reveal.then(|| verdict(question, index, chosen)).flatten(),
            })
            .collect();

        let feedback = chosen.filter(|_| reveal).map(|choice| FeedbackVm {
            correct: question.is_correct(choice),
            correct_choice: question.correct_choice().to_string(),
            explanation: question.explanation().map(str::to_string),
            sources: question.sources().to_vec(),
        });

        let palette = session
            .questions()
            .enumerate()
            .map(|(position, q)| PaletteItemVm {
                position,
                label: (position + 1).to_string(),
                answered: session.answer_for(q.id()).is_some(),
                current: position == session.position(),
            })
            .collect();

        let time_left = session.time_left();

        Self {
            progress_label: format!("Question {} / {}", session.position() + 1, session.len()),
            answered_label: format!("{} / {} répondues", session.answered_count(), session.len()),
            chapter: question.chapter().to_string(),
            level_label: question.level().label(),
            mode_label: session.mode().label(),
            question: question.text().to_string(),
            choices,
            feedback,
            palette,
            timer_label: time_left.map(format_countdown),
            time_low: time_left.is_some_and(|left| left <= LOW_TIME_SECS),
            is_first: session.is_first(),
            is_last: session.is_last(),
            confirm_unanswered: pending_finish,
        }
    }

    #[must_use]
    pub fn confirm_message(&self) -> Option<String> {
        self.confirm_unanswered.map(|n| match n {
            1 => "1 question est sans réponse. Terminer quand même ?".to_string(),
            n => format!("{n} questions sont sans réponse. Terminer quand même ?"),
        })
    }
}

fn verdict(question: &Question, index: usize, chosen: Option<usize>) -> Option<ChoiceVerdict> {
    if question.is_correct(index) {
        Some(ChoiceVerdict::Correct)
    } else if chosen == Some(index) {
        Some(ChoiceVerdict::Wrong)
    } else {
        None
    }
}
