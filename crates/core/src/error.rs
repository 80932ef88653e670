use thiserror::Error;

use crate::model::{ChapterRecordError, IdentityError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    ChapterRecord(#[from] ChapterRecordError),
}
