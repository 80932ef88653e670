#![forbid(unsafe_code)]

pub mod bank;
pub mod cache;
pub mod error;
pub mod source;
pub mod table;

pub use bank::{LoadReport, QuestionBank};
pub use cache::QuestionBankCache;
pub use error::{DataLoadError, RowRejection, ValidationError};
pub use source::{FileSource, HttpSource, InMemorySource, QuestionSource, SourceLocation};
pub use table::parse_question_table;
