use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ChapterId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterRecordError {
    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Progress summary for one chapter, kept for the lifetime of the process.
///
/// Created on the first activation of a chapter and updated on each
/// completion. Only the most recent completion is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    chapter_id: ChapterId,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    final_score: u32,
    total_questions: u32,
    completed: bool,
}

impl ChapterRecord {
    /// Fresh record for a chapter activated at `started_at`.
    #[must_use]
    pub fn started(chapter_id: ChapterId, total_questions: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            chapter_id,
            started_at,
            completed_at: None,
            final_score: 0,
            total_questions,
            completed: false,
        }
    }

    /// Stamp a completion, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `ChapterRecordError::ScoreExceedsTotal` if `score > total_questions`.
    pub fn complete(
        &mut self,
        score: u32,
        total_questions: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<(), ChapterRecordError> {
        if score > total_questions {
            return Err(ChapterRecordError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        self.final_score = score;
        self.total_questions = total_questions;
        self.completed_at = Some(completed_at);
        self.completed = true;
        Ok(())
    }

    #[must_use]
    pub fn chapter_id(&self) -> &ChapterId {
        &self.chapter_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
