use serde::{Deserialize, Serialize};

use crate::model::ids::ChapterId;
use crate::model::question::Question;

/// A named group of questions kept in source order.
///
/// Source order is canonical; the order in which a learner sees the
/// questions is a separate traversal permutation over these indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    questions: Vec<Question>,
}

impl Chapter {
    #[must_use]
    pub fn new(id: ChapterId, questions: Vec<Question>) -> Self {
        Self { id, questions }
    }

    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
