//! Errors raised while loading the question table.

use std::path::PathBuf;

use quiz_core::model::{ChapterId, QuestionError};
use thiserror::Error;

/// Fatal load failures. Nothing can be shown until the table loads.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataLoadError {
    #[error("failed to read question file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("question source {url} returned status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed question table: {0}")]
    Malformed(#[from] csv::Error),

    #[error("question table is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("question table contains no chapters")]
    NoChapters,
}

/// Why a single row was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RowRejection {
    #[error("chapter is empty")]
    MissingChapter,

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("duplicate question in chapter {0}")]
    Duplicate(ChapterId),

    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A recoverable per-row problem. The row is dropped and loading continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("row {line}: {reason}")]
pub struct ValidationError {
    pub line: u64,
    pub reason: RowRejection,
}
