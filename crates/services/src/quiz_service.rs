use rand::Rng;
use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::{Preferences, QuestionBank};
use quiz_core::quiz::{Intent, QuizController, SessionError, Transition};

use crate::error::ExportError;
use crate::export::results_csv;

/// Drives a `QuizController` with the service clock and logs transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizService {
    clock: Clock,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a session with the thread RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no question matches or a quiz is running.
    pub fn start(
        &self,
        controller: &mut QuizController,
        bank: &QuestionBank,
        prefs: &Preferences,
    ) -> Result<Transition, SessionError> {
        self.start_with_rng(controller, bank, prefs, &mut rand::rng())
    }

    /// Start a session with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no question matches or a quiz is running.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &self,
        controller: &mut QuizController,
        bank: &QuestionBank,
        prefs: &Preferences,
        rng: &mut R,
    ) -> Result<Transition, SessionError> {
        let transition = controller.start(bank, prefs, rng, self.clock.now())?;
        if let Some(session) = controller.session() {
            info!(
                questions = session.len(),
                mode = %session.mode(),
                timer_secs = session.time_limit(),
                "quiz started"
            );
        }
        Ok(transition)
    }

    /// Run the same questions again from the results screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInQuiz` outside the results screen.
    pub fn retry(
        &self,
        controller: &mut QuizController,
        shuffle: bool,
    ) -> Result<Transition, SessionError> {
        let transition = controller.retry(shuffle, &mut rand::rng(), self.clock.now())?;
        info!(shuffle, "quiz restarted");
        Ok(transition)
    }

    /// Apply `intent` at the current clock time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidChoice` for an answer outside the choices.
    pub fn dispatch(
        &self,
        controller: &mut QuizController,
        intent: Intent,
    ) -> Result<Transition, SessionError> {
        let transition = controller.dispatch(intent, self.clock.now())?;
        match transition {
            Transition::Finished(reason) => {
                if let Some(score) = controller.score() {
                    info!(
                        ?reason,
                        ok = score.ok,
                        total = score.total,
                        pct = score.pct,
                        "quiz finished"
                    );
                }
            }
            Transition::Ignored => {}
            // Ticks fire every second; keep them out of debug output.
            Transition::Updated if intent == Intent::Tick => {}
            other => debug!(?intent, transition = ?other, "quiz transition"),
        }
        Ok(transition)
    }

    /// Results table of the finished session, `None` outside the results screen.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the CSV writer fails.
    pub fn results_csv(&self, controller: &QuizController) -> Result<Option<String>, ExportError> {
        controller.score().as_ref().map(results_csv).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank_service::BankService;
    use quiz_core::quiz::{FinishReason, Screen};
    use quiz_core::time::fixed_clock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn start_answer_and_finish_produces_csv() {
        let service = QuizService::new(fixed_clock());
        let bank = BankService::bundled().unwrap();
        let prefs = Preferences {
            count: 2,
            ..Preferences::default()
        };
        let mut controller = QuizController::new();
        service
            .start_with_rng(&mut controller, &bank, &prefs, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(service.results_csv(&controller).unwrap(), None);

        service.dispatch(&mut controller, Intent::Answer(0)).unwrap();
        service.dispatch(&mut controller, Intent::Next).unwrap();
        service.dispatch(&mut controller, Intent::Answer(1)).unwrap();
        let done = service.dispatch(&mut controller, Intent::Next).unwrap();

        assert_eq!(done, Transition::Finished(FinishReason::Completed));
        assert_eq!(controller.screen(), Screen::Results);
        let csv = service.results_csv(&controller).unwrap().unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn retry_returns_to_quiz_with_fresh_answers() {
        let service = QuizService::new(fixed_clock());
        let bank = BankService::bundled().unwrap();
        let prefs = Preferences {
            count: 1,
            ..Preferences::default()
        };
        let mut controller = QuizController::new();
        service.start(&mut controller, &bank, &prefs).unwrap();
        service.dispatch(&mut controller, Intent::Answer(0)).unwrap();
        service.dispatch(&mut controller, Intent::Finish).unwrap();
        assert_eq!(controller.screen(), Screen::Results);

        service.retry(&mut controller, true).unwrap();
        assert_eq!(controller.screen(), Screen::Quiz);
        assert_eq!(controller.session().unwrap().answered_count(), 0);
    }
}
