use chrono::{DateTime, Utc};
use std::collections::HashMap;

use quiz_core::model::{ChapterId, ChapterRecord};

use super::service::ChapterFinished;
use crate::error::LedgerError;

/// One `ChapterRecord` per chapter ever activated, in first-activation order.
///
/// Outlives individual sessions. Records are never removed and only the
/// latest completion of a chapter is kept.
#[derive(Debug, Clone, Default)]
pub struct ProgressLedger {
    records: Vec<ChapterRecord>,
    index: HashMap<ChapterId, usize>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the record for `chapter_id` on first activation; otherwise
    /// return the existing record unchanged.
    pub fn ensure_record(
        &mut self,
        chapter_id: &ChapterId,
        total_questions: u32,
        now: DateTime<Utc>,
    ) -> &ChapterRecord {
        let slot = match self.index.get(chapter_id) {
            Some(&slot) => slot,
            None => {
                let slot = self.records.len();
                self.records.push(ChapterRecord::started(
                    chapter_id.clone(),
                    total_questions,
                    now,
                ));
                self.index.insert(chapter_id.clone(), slot);
                slot
            }
        };
        &self.records[slot]
    }

    /// Stamp a completion on an existing record, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownChapter` if the chapter was never activated,
    /// or `LedgerError::Record` if the score exceeds the question count.
    pub fn record_completion(
        &mut self,
        chapter_id: &ChapterId,
        score: u32,
        total_questions: u32,
        now: DateTime<Utc>,
    ) -> Result<&ChapterRecord, LedgerError> {
        let slot = *self
            .index
            .get(chapter_id)
            .ok_or_else(|| LedgerError::UnknownChapter(chapter_id.clone()))?;
        self.records[slot].complete(score, total_questions, now)?;
        Ok(&self.records[slot])
    }

    /// Apply a session's completion event.
    ///
    /// # Errors
    ///
    /// See [`ProgressLedger::record_completion`].
    pub fn apply(&mut self, event: &ChapterFinished) -> Result<&ChapterRecord, LedgerError> {
        self.record_completion(
            &event.chapter_id,
            event.score,
            event.total_questions,
            event.finished_at,
        )
    }

    #[must_use]
    pub fn get(&self, chapter_id: &ChapterId) -> Option<&ChapterRecord> {
        self.index.get(chapter_id).map(|&slot| &self.records[slot])
    }

    /// Records in first-activation order.
    #[must_use]
    pub fn records(&self) -> &[ChapterRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of chapters completed at least once.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed()).count()
    }
}
