use std::collections::HashMap;
use std::sync::Arc;

use quiz_core::model::{Chapter, ChapterId};

use crate::error::ValidationError;

/// Loaded question table grouped by chapter.
///
/// Chapters keep first-seen order from the source and are shared read-only
/// between learner sessions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    chapters: Vec<Arc<Chapter>>,
    index: HashMap<ChapterId, usize>,
}

impl QuestionBank {
    /// Builds a bank from chapters in display order. Later duplicates of a
    /// chapter id are ignored.
    #[must_use]
    pub fn new(chapters: impl IntoIterator<Item = Chapter>) -> Self {
        let mut bank = Self::default();
        for chapter in chapters {
            if bank.index.contains_key(chapter.id()) {
                continue;
            }
            bank.index.insert(chapter.id().clone(), bank.chapters.len());
            bank.chapters.push(Arc::new(chapter));
        }
        bank
    }

    /// Chapter labels in first-seen order.
    pub fn chapter_ids(&self) -> impl Iterator<Item = &ChapterId> {
        self.chapters.iter().map(|c| c.id())
    }

    #[must_use]
    pub fn chapter(&self, id: &ChapterId) -> Option<Arc<Chapter>> {
        self.index.get(id).map(|&i| Arc::clone(&self.chapters[i]))
    }

    #[must_use]
    pub fn chapters(&self) -> &[Arc<Chapter>] {
        &self.chapters
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Total number of questions across all chapters.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.chapters.iter().map(|c| c.len()).sum()
    }
}

/// Result of a successful load: the bank plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub bank: Arc<QuestionBank>,
    pub rejected: Vec<ValidationError>,
}
