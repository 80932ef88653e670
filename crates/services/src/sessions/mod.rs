mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{LedgerError, SessionError};
pub use progress::ProgressLedger;
pub use service::{ChapterFinished, Feedback, QuizSession, SessionState};
pub use view::{OptionView, QuestionView, QuizView, format_percentage, score_percentage};
pub use workflow::{Activation, LearnerContext, NavigationResult, QuizLoopService};
