use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::bank_service::BankService;
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::quiz_service::QuizService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    bank: Arc<BankService>,
    preferences: Arc<PreferencesService>,
    quiz: QuizService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a throwaway in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            clock,
            bank: Arc::new(BankService::new(Arc::clone(&storage.kv))),
            preferences: Arc::new(PreferencesService::new(Arc::clone(&storage.kv))),
            quiz: QuizService::new(clock),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
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
}
