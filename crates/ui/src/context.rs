use std::path::{Path, PathBuf};
use std::sync::Arc;

use services::{BankService, PreferencesService, QuizService};

pub trait UiApp: Send + Sync {
    fn bank(&self) -> Arc<BankService>;
    fn preferences(&self) -> Arc<PreferencesService>;
    fn quiz(&self) -> QuizService;

    /// Where in-app exports are written.
    fn export_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    bank: Arc<BankService>,
    preferences: Arc<PreferencesService>,
    quiz: QuizService,
    export_dir: Arc<PathBuf>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            bank: app.bank(),
            preferences: app.preferences(),
            quiz: app.quiz(),
            export_dir: Arc::new(app.export_dir()),
        }
    }

    #[must_use]
    pub fn bank(&self) -> Arc<BankService> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn quiz(&self) -> QuizService {
        self.quiz
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
