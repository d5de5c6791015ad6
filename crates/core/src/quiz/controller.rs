use chrono::{DateTime, Utc};
use rand::Rng;

use crate::model::{Preferences, QuestionBank};
use crate::quiz::score::Score;
use crate::quiz::session::{QuizSession, SessionError};

/// Which of the three screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Quiz,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Every question had an answer.
    Completed,
    /// The user confirmed finishing with unanswered questions.
    Confirmed,
    /// The countdown reached zero.
    TimeUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Home,
    Quiz {
        session: QuizSession,
        /// Set while the "finish with unanswered questions?" prompt is open.
        pending_finish: Option<usize>,
    },
    Results {
        session: QuizSession,
        finished_at: DateTime<Utc>,
        reason: FinishReason,
    },
}

/// User or timer event delivered to a running controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Answer(usize),
    Next,
    Prev,
    Goto(usize),
    Finish,
    ConfirmFinish,
    CancelFinish,
    /// One second of countdown elapsed.
    Tick,
    Quit,
    NewSession,
}

/// What an event did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event does not apply to the current state.
    Ignored,
    Started,
    /// Still in the quiz, with changed cursor, answers or timer.
    Updated,
    ConfirmationRequired { unanswered: usize },
    Finished(FinishReason),
    ReturnedHome,
}

/// Home → Quiz → Results state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizController {
    state: QuizState,
}

impl Default for QuizController {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: QuizState::Home,
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        match self.state {
            QuizState::Home => Screen::Home,
            QuizState::Quiz { .. } => Screen::Quiz,
            QuizState::Results { .. } => Screen::Results,
        }
    }

    /// The running or finished session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Home => None,
            QuizState::Quiz { session, .. } | QuizState::Results { session, .. } => Some(session),
        }
    }

    #[must_use]
    pub fn pending_finish(&self) -> Option<usize> {
        match self.state {
            QuizState::Quiz { pending_finish, .. } => pending_finish,
            _ => None,
        }
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        match self.state {
            QuizState::Results { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Score of the finished session. `None` outside the results screen.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        match &self.state {
            QuizState::Results { session, .. } => Some(Score::of(session)),
            _ => None,
        }
    }

    /// Home → Quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoMatchingQuestions` when the filters select
    /// nothing, and `SessionError::AlreadyRunning` outside the home screen.
    /// The state is unchanged on error.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        prefs: &Preferences,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        if !matches!(self.state, QuizState::Home) {
            return Err(SessionError::AlreadyRunning);
        }
        let session = QuizSession::build(bank, prefs, rng, now)?;
        self.state = QuizState::Quiz {
            session,
            pending_finish: None,
        };
        Ok(Transition::Started)
    }

    /// Results → Quiz over the same questions, answers and timer reset.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInQuiz` unless the results screen is showing.
    pub fn retry<R: Rng + ?Sized>(
        &mut self,
        shuffle: bool,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        let QuizState::Results { session, .. } = &self.state else {
            return Err(SessionError::NotInQuiz);
        };
        let session = session.restarted(shuffle, rng, now);
        self.state = QuizState::Quiz {
            session,
            pending_finish: None,
        };
        Ok(Transition::Started)
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidChoice` for an answer the current
    /// question does not offer. Events that do not apply to the current
    /// state yield `Ok(Transition::Ignored)`.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        match intent {
            Intent::Quit => Ok(self.quit()),
            Intent::NewSession => Ok(self.new_session()),
            Intent::Tick => Ok(self.tick(now)),
            Intent::ConfirmFinish => Ok(self.confirm_finish(now)),
            Intent::CancelFinish => Ok(self.cancel_finish()),
            Intent::Finish => Ok(self.request_finish(now)),
            Intent::Answer(choice) => self.answer(choice),
            Intent::Next => Ok(self.next(now)),
            Intent::Prev => Ok(self.prev()),
            Intent::Goto(position) => Ok(self.goto(position)),
        }
    }

    fn active_session(&mut self) -> Option<&mut QuizSession> {
        match &mut self.state {
            QuizState::Quiz {
                session,
                pending_finish: None,
            } => Some(session),
            _ => None,
        }
    }

    fn answer(&mut self, choice: usize) -> Result<Transition, SessionError> {
        let Some(session) = self.active_session() else {
            return Ok(Transition::Ignored);
        };
        session.record_answer(choice)?;
        Ok(Transition::Updated)
    }

    fn next(&mut self, now: DateTime<Utc>) -> Transition {
        let Some(session) = self.active_session() else {
            return Transition::Ignored;
        };
        if session.step_forward() {
            Transition::Updated
        } else {
            self.request_finish(now)
        }
    }

    fn prev(&mut self) -> Transition {
        let Some(session) = self.active_session() else {
            return Transition::Ignored;
        };
        if session.step_back() {
            Transition::Updated
        } else {
            Transition::Ignored
        }
    }

    fn goto(&mut self, position: usize) -> Transition {
        match self.active_session() {
            Some(session) => {
                session.jump_to(position);
                Transition::Updated
            }
            None => Transition::Ignored,
        }
    }

    fn request_finish(&mut self, now: DateTime<Utc>) -> Transition {
        let QuizState::Quiz {
            session,
            pending_finish,
        } = &mut self.state
        else {
            return Transition::Ignored;
        };
        let unanswered = session.unanswered_count();
        if unanswered == 0 {
            return self.finish(FinishReason::Completed, now);
        }
        *pending_finish = Some(unanswered);
        Transition::ConfirmationRequired { unanswered }
    }

    fn confirm_finish(&mut self, now: DateTime<Utc>) -> Transition {
        if self.pending_finish().is_none() {
            return Transition::Ignored;
        }
        self.finish(FinishReason::Confirmed, now)
    }

    fn cancel_finish(&mut self) -> Transition {
        match &mut self.state {
            QuizState::Quiz { pending_finish, .. } if pending_finish.is_some() => {
                *pending_finish = None;
                Transition::Updated
            }
            _ => Transition::Ignored,
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) -> Transition {
        let QuizState::Quiz { session, .. } = &mut self.state else {
            return Transition::Ignored;
        };
        if !session.is_timed() {
            return Transition::Ignored;
        }
        if session.tick(1) {
            // Time-up submits as-is, unanswered questions included.
            return self.finish(FinishReason::TimeUp, now);
        }
        Transition::Updated
    }

    fn quit(&mut self) -> Transition {
        if !matches!(self.state, QuizState::Quiz { .. }) {
            return Transition::Ignored;
        }
        self.state = QuizState::Home;
        Transition::ReturnedHome
    }

    fn new_session(&mut self) -> Transition {
        if !matches!(self.state, QuizState::Results { .. }) {
            return Transition::Ignored;
        }
        self.state = QuizState::Home;
        Transition::ReturnedHome
    }

    fn finish(&mut self, reason: FinishReason, now: DateTime<Utc>) -> Transition {
        let state = std::mem::replace(&mut self.state, QuizState::Home);
        match state {
            QuizState::Quiz { session, .. } => {
                self.state = QuizState::Results {
                    session,
                    finished_at: now,
                    reason,
                };
                Transition::Finished(reason)
            }
            other => {
                self.state = other;
                Transition::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Level, Question, QuestionDraft, QuestionId, QuestionKind, QuizMode};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank(size: usize) -> QuestionBank {
        let questions: Vec<Question> = (1..=size)
            .map(|i| {
                QuestionDraft {
                    id: QuestionId::new(format!("q{i}")),
                    kind: QuestionKind::Mcq,
                    chapitre: "Général".into(),
                    niveau: Level::Beginner,
                    question: format!("Question {i}"),
                    choices: vec!["a".into(), "b".into(), "c".into()],
                    answer_index: 1,
                    explanation: None,
                    sources: Vec::new(),
                }
                .validate()
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    fn started(size: usize, prefs: &Preferences) -> QuizController {
        let mut controller = QuizController::new();
        let transition = controller
            .start(&bank(size), prefs, &mut StdRng::seed_from_u64(11), fixed_now())
            .unwrap();
        assert_eq!(transition, Transition::Started);
        controller
    }

    fn exam_prefs() -> Preferences {
        Preferences {
            mode: QuizMode::Exam,
            randomize: false,
            ..Preferences::default()
        }
    }

    #[test]
    fn start_without_matches_stays_home() {
        let prefs = Preferences {
            level: Some(Level::Advanced),
            ..Preferences::default()
        };
        let mut controller = QuizController::new();
        let err = controller
            .start(&bank(3), &prefs, &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap_err();
        assert_eq!(err, SessionError::NoMatchingQuestions);
        assert_eq!(controller.screen(), Screen::Home);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut controller = started(2, &exam_prefs());
        let err = controller
            .start(&bank(2), &exam_prefs(), &mut StdRng::seed_from_u64(1), fixed_now())
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyRunning);
    }

    #[test]
    fn next_on_last_question_with_all_answered_finishes() {
        let mut controller = started(2, &exam_prefs());
        let now = fixed_now();
        controller.dispatch(Intent::Answer(1), now).unwrap();
        controller.dispatch(Intent::Next, now).unwrap();
        controller.dispatch(Intent::Answer(0), now).unwrap();
        let transition = controller.dispatch(Intent::Next, now).unwrap();
        assert_eq!(transition, Transition::Finished(FinishReason::Completed));
        assert_eq!(controller.screen(), Screen::Results);
        let score = controller.score().unwrap();
        assert_eq!((score.ok, score.total, score.pct), (1, 2, 50));
    }

    #[test]
    fn finish_with_unanswered_needs_confirmation() {
        let mut controller = started(3, &exam_prefs());
        let now = fixed_now();
        controller.dispatch(Intent::Answer(1), now).unwrap();

        let transition = controller.dispatch(Intent::Finish, now).unwrap();
        assert_eq!(transition, Transition::ConfirmationRequired { unanswered: 2 });
        assert_eq!(controller.pending_finish(), Some(2));
        assert_eq!(controller.dispatch(Intent::Next, now).unwrap(), Transition::Ignored);

        controller.dispatch(Intent::CancelFinish, now).unwrap();
        assert_eq!(controller.screen(), Screen::Quiz);
        assert_eq!(controller.pending_finish(), None);

        controller.dispatch(Intent::Finish, now).unwrap();
        let transition = controller.dispatch(Intent::ConfirmFinish, now).unwrap();
        assert_eq!(transition, Transition::Finished(FinishReason::Confirmed));
        assert_eq!(controller.finish_reason(), Some(FinishReason::Confirmed));
    }

    #[test]
    fn timer_expiry_finishes_without_confirmation() {
        let prefs = Preferences {
            timer_enabled: true,
            timer_minutes: 1,
            ..exam_prefs()
        };
        let mut controller = started(4, &prefs);
        let now = fixed_now();
        for _ in 0..59 {
            assert_eq!(controller.dispatch(Intent::Tick, now).unwrap(), Transition::Updated);
        }
        assert_eq!(controller.session().unwrap().time_left(), Some(1));
        let transition = controller.dispatch(Intent::Tick, now).unwrap();
        assert_eq!(transition, Transition::Finished(FinishReason::TimeUp));
        assert_eq!(controller.screen(), Screen::Results);
        assert_eq!(controller.pending_finish(), None);
        assert_eq!(controller.score().unwrap().ok, 0);
    }

    #[test]
    fn timer_expiry_overrides_an_open_prompt() {
        let prefs = Preferences {
            timer_enabled: true,
            timer_minutes: 1,
            ..exam_prefs()
        };
        let mut controller = started(2, &prefs);
        let now = fixed_now();
        controller.dispatch(Intent::Finish, now).unwrap();
        for _ in 0..60 {
            controller.dispatch(Intent::Tick, now).unwrap();
        }
        assert_eq!(controller.finish_reason(), Some(FinishReason::TimeUp));
    }

    #[test]
    fn ticks_are_ignored_when_untimed_or_idle() {
        let mut controller = QuizController::new();
        assert_eq!(controller.dispatch(Intent::Tick, fixed_now()).unwrap(), Transition::Ignored);
        let mut controller = started(2, &exam_prefs());
        assert_eq!(controller.dispatch(Intent::Tick, fixed_now()).unwrap(), Transition::Ignored);
    }

    #[test]
    fn quit_and_new_session_return_home() {
        let now = fixed_now();
        let mut controller = started(1, &exam_prefs());
        assert_eq!(controller.dispatch(Intent::NewSession, now).unwrap(), Transition::Ignored);
        assert_eq!(controller.dispatch(Intent::Quit, now).unwrap(), Transition::ReturnedHome);
        assert!(controller.session().is_none());

        let mut controller = started(1, &exam_prefs());
        controller.dispatch(Intent::Answer(0), now).unwrap();
        controller.dispatch(Intent::Finish, now).unwrap();
        assert_eq!(controller.dispatch(Intent::Quit, now).unwrap(), Transition::Ignored);
        assert_eq!(
            controller.dispatch(Intent::NewSession, now).unwrap(),
            Transition::ReturnedHome
        );
        assert_eq!(controller.screen(), Screen::Home);
    }

    #[test]
    fn retry_restarts_same_questions() {
        let now = fixed_now();
        let mut controller = started(3, &exam_prefs());
        controller.dispatch(Intent::Answer(1), now).unwrap();
        controller.dispatch(Intent::Finish, now).unwrap();
        controller.dispatch(Intent::ConfirmFinish, now).unwrap();

        let transition = controller
            .retry(true, &mut StdRng::seed_from_u64(5), now)
            .unwrap();
        assert_eq!(transition, Transition::Started);
        let session = controller.session().unwrap();
        assert_eq!(session.len(), 3);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn invalid_answer_is_an_error_and_prev_is_clamped() {
        let now = fixed_now();
        let mut controller = started(2, &exam_prefs());
        assert_eq!(
            controller.dispatch(Intent::Answer(5), now),
            Err(SessionError::InvalidChoice { choice: 5, len: 3 })
        );
        assert_eq!(controller.dispatch(Intent::Prev, now).unwrap(), Transition::Ignored);
        controller.dispatch(Intent::Goto(1), now).unwrap();
        assert_eq!(controller.session().unwrap().position(), 1);
    }
}
