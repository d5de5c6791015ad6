#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_service;
pub mod error;
pub mod export;
pub mod import;
pub mod keys;
pub mod preferences_service;
pub mod quiz_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use bank_service::BankService;
pub use error::{AppServicesError, BankServiceError, ExportError, ImportError, ImportIssue};
pub use export::{RESULTS_HEADER, bank_to_json, results_csv};
pub use import::parse_bank;
pub use preferences_service::PreferencesService;
pub use quiz_service::QuizService;
