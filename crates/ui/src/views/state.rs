use dioxus::prelude::*;
use quiz_core::model::{BankError, QuestionError};
use quiz_core::quiz::SessionError;
use services::{BankServiceError, ImportError, ImportIssue};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    BankUnavailable,
    NoMatchingQuestions,
    ImportRejected(String),
    FileUnreadable(String),
    ExportFailed(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::Unknown => "Une erreur est survenue. Veuillez réessayer.".to_string(),
            ViewError::BankUnavailable => "La banque de questions n'a pas pu être chargée.".to_string(),
            ViewError::NoMatchingQuestions => {
                "Aucune question ne correspond au chapitre et au niveau choisis.".to_string()
            }
            ViewError::ImportRejected(reason) => format!("Import refusé : {reason}"),
            ViewError::FileUnreadable(what) => format!("Fichier illisible : {what}"),
            ViewError::ExportFailed(what) => format!("Export impossible : {what}"),
        }
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoMatchingQuestions => ViewError::NoMatchingQuestions,
            _ => ViewError::Unknown,
        }
    }
}

impl From<BankServiceError> for ViewError {
    fn from(err: BankServiceError) -> Self {
        match err {
            BankServiceError::Import(err) => ViewError::ImportRejected(import_reason(&err)),
            BankServiceError::Export(err) => ViewError::ExportFailed(err.to_string()),
            BankServiceError::BundledBank(_) => ViewError::BankUnavailable,
            _ => ViewError::Unknown,
        }
    }
}

fn import_reason(err: &ImportError) -> String {
    match err {
        ImportError::Json(err) => {
            format!("JSON invalide (ligne {}, colonne {})", err.line(), err.column())
        }
        ImportError::NotAnArray => "le fichier doit contenir un tableau JSON de questions".to_string(),
        ImportError::Record {
            position,
            id,
            issue,
        } => {
            let id = id.as_deref().map(|id| format!(" (id {id})")).unwrap_or_default();
            format!("question n°{position}{id} : {}", issue_reason(issue))
        }
        ImportError::Bank(BankError::DuplicateId(id)) => format!("identifiant en double : {id}"),
        _ => "contenu invalide".to_string(),
    }
}

fn issue_reason(issue: &ImportIssue) -> String {
    match issue {
        ImportIssue::NotAnObject => "un objet est attendu".to_string(),
        ImportIssue::WrongType(found) => format!("le type doit être mcq (trouvé {found})"),
        ImportIssue::ChoicesNotAList => "choices doit être une liste".to_string(),
        ImportIssue::ChoiceNotText => "chaque choix doit être un texte".to_string(),
        ImportIssue::AnswerIndexNotNumeric => "answerIndex doit être un nombre".to_string(),
        ImportIssue::AnswerIndexNotInteger => {
            "answerIndex doit être un entier positif ou nul".to_string()
        }
        ImportIssue::SourcesNotStrings => "sources doit être une liste de textes".to_string(),
        ImportIssue::Malformed(_) => "champ manquant ou de type incorrect".to_string(),
        ImportIssue::Invalid(err) => match err {
            QuestionError::EmptyId => "identifiant vide".to_string(),
            QuestionError::EmptyText => "texte de la question vide".to_string(),
            QuestionError::NoChoices => "aucun choix proposé".to_string(),
            QuestionError::AnswerOutOfRange { index, len } => {
                format!("answerIndex {index} hors limites pour {len} choix")
            }
            _ => "question invalide".to_string(),
        },
        _ => "enregistrement invalide".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Result line shown under an action button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(ViewError),
}

impl Notice {
    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Notice::Info(_) => "notice notice--info",
            Notice::Error(_) => "notice notice--error",
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Notice::Info(text) => text.clone(),
            Notice::Error(err) => err.message(),
        }
    }
}
