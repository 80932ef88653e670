#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod report;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::{AppServices, ShuffleMode};
pub use error::{AppServicesError, LedgerError, ReportError, SessionError};
pub use report::{
    JsonReportEncoder, PdfReportEncoder, ReportBuilder, ReportDocument, ReportEncoder, ReportFile,
};
pub use sessions::{
    Activation, Feedback, LearnerContext, NavigationResult, ProgressLedger, QuizLoopService,
    QuizSession, QuizView, SessionState,
};
