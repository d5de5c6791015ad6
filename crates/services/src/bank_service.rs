use std::sync::Arc;

use quiz_core::model::QuestionBank;
use storage::repository::KeyValueStore;
use tracing::{info, warn};

use crate::error::{BankServiceError, ExportError};
use crate::export::bank_to_json;
use crate::import::parse_bank;
use crate::keys;

const BUNDLED_BANK: &str = include_str!("../data/default_bank.json");

/// Owns loading, importing and exporting the question bank.
#[derive(Clone)]
pub struct BankService {
    kv: Arc<dyn KeyValueStore>,
}

impl BankService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The sample bank shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::BundledBank` if the embedded file is invalid.
    pub fn bundled() -> Result<QuestionBank, BankServiceError> {
        parse_bank(BUNDLED_BANK).map_err(BankServiceError::BundledBank)
    }

    /// Load the stored bank, or the bundled one when nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::BundledBank` only if the fallback itself is invalid.
    pub async fn load(&self) -> Result<QuestionBank, BankServiceError> {
        let stored = match self.kv.get(keys::BANK).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "failed to read stored bank; using bundled bank");
                None
            }
        };

        if let Some(raw) = stored {
            match parse_bank(&raw) {
                Ok(bank) => {
                    info!(questions = bank.len(), "loaded stored bank");
                    return Ok(bank);
                }
                Err(err) => warn!(error = %err, "stored bank is invalid; using bundled bank"),
            }
        }

        let bank = Self::bundled()?;
        info!(questions = bank.len(), "loaded bundled bank");
        Ok(bank)
    }

    /// Validate `raw` and persist it on success. Persistence is best-effort;
    /// the caller swaps in the returned bank either way.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Import` if validation fails. Nothing is
    /// written in that case.
    pub async fn import_json(&self, raw: &str) -> Result<QuestionBank, BankServiceError> {
        let bank = parse_bank(raw)?;
        info!(questions = bank.len(), "imported bank");
        self.save(&bank).await;
        Ok(bank)
    }

    /// Persist `bank`, logging instead of failing.
    pub async fn save(&self, bank: &QuestionBank) {
        if let Err(err) = self.persist(bank).await {
            warn!(error = %err, "failed to persist bank");
        }
    }

    /// Persist `bank`, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError` if serialization or the store write fails.
    pub async fn persist(&self, bank: &QuestionBank) -> Result<(), BankServiceError> {
        let json = serde_json::to_string(bank).map_err(ExportError::from)?;
        self.kv.set(keys::BANK, &json).await?;
        Ok(())
    }

    /// Forget the stored bank and return the bundled one.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::BundledBank` if the embedded file is invalid.
    pub async fn reset(&self) -> Result<QuestionBank, BankServiceError> {
        if let Err(err) = self.kv.remove(keys::BANK).await {
            warn!(error = %err, "failed to clear stored bank");
        }
        Self::bundled()
    }

    /// Pretty JSON for the export file.
    ///
    /// # Errors
    ///
    /// Returns `BankServiceError::Export` if serialization fails.
    pub fn export_json(&self, bank: &QuestionBank) -> Result<String, BankServiceError> {
        Ok(bank_to_json(bank)?)
    }
}
