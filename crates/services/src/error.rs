//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ChapterId, ChapterRecordError, QuestionError};
use storage::DataLoadError;

/// Errors emitted by the progress ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("no progress record for chapter {0}; it was never activated")]
    UnknownChapter(ChapterId),
    #[error(transparent)]
    Record(#[from] ChapterRecordError),
}

/// Contract violations on the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no chapter is active")]
    NoActiveChapter,
    #[error("chapter {0} has no questions")]
    EmptyChapter(ChapterId),
    #[error("chapter already completed")]
    Completed,
    #[error("unknown chapter {0}")]
    UnknownChapter(ChapterId),
    #[error("traversal order is not a permutation of {expected} questions")]
    InvalidOrder { expected: usize },
    #[error(transparent)]
    InvalidLetter(#[from] QuestionError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors emitted while producing a progress report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("a user name is required before generating a report")]
    MissingUserName,
    #[error("report encoding failed: {0}")]
    Encoding(String),
    #[error("the PDF report cannot show {character:?} in {text:?}; use the JSON format")]
    UnsupportedText { character: char, text: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
}

