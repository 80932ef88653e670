mod chapter;
mod identity;
mod ids;
mod question;
mod record;

pub use chapter::Chapter;
pub use identity::{IdentityError, UserIdentity};
pub use ids::{ChapterId, LearnerId, QuestionId};
pub use question::{AnswerLetter, Question, QuestionError};
pub use record::{ChapterRecord, ChapterRecordError};
