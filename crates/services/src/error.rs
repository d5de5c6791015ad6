//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuestionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// What is wrong with one record of an imported bank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportIssue {
    #[error("expected an object")]
    NotAnObject,
    #[error("type must be \"mcq\" (found {0})")]
    WrongType(String),
    #[error("choices must be a list")]
    ChoicesNotAList,
    #[error("every choice must be text")]
    ChoiceNotText,
    #[error("answerIndex must be a number")]
    AnswerIndexNotNumeric,
    #[error("answerIndex must be a whole number >= 0")]
    AnswerIndexNotInteger,
    #[error("sources must be a list of strings")]
    SourcesNotStrings,
    #[error("{0}")]
    Malformed(String),
    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// Errors emitted while importing a bank. The current bank is never touched
/// when one of these is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of questions")]
    NotAnArray,
    #[error("question #{position}{}: {issue}", id_label(.id))]
    Record {
        /// 1-based position in the imported array.
        position: usize,
        id: Option<String>,
        issue: ImportIssue,
    },
    #[error(transparent)]
    Bank(#[from] BankError),
}

fn id_label(id: &Option<String>) -> String {
    id.as_deref()
        .map(|id| format!(" (id {id})"))
        .unwrap_or_default()
}

/// Errors emitted while serializing the bank or results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("results table is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("CSV writer could not be flushed: {0}")]
    Flush(String),
}

/// Errors emitted by `BankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankServiceError {
    #[error("bundled question bank is invalid: {0}")]
    BundledBank(#[source] ImportError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] BankServiceError),
}
