use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use quiz_core::model::{AnswerLetter, Chapter, ChapterId, Question};
use quiz_core::shuffle::is_permutation;

use crate::error::SessionError;

//
// ─── STATE & FEEDBACK ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    ChapterComplete,
}

/// Feedback line shown under the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
    ChapterComplete,
}

impl Feedback {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Feedback::None => "",
            Feedback::Correct => "Correct!",
            Feedback::Incorrect => "Try again",
            Feedback::ChapterComplete => "You reached the end of this chapter!",
        }
    }
}

/// Emitted exactly once per activation, when the learner moves past the last question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFinished {
    pub chapter_id: ChapterId,
    pub score: u32,
    pub total_questions: u32,
    pub finished_at: DateTime<Utc>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One activation of a chapter: traversal order, cursor, per-question
/// solved flags and score.
///
/// A question contributes to the score at most once per activation.
/// Completion is final for the activation; moving back with `prev` lets the
/// learner review but never re-opens the chapter.
pub struct QuizSession {
    chapter: Arc<Chapter>,
    order: Vec<usize>,
    cursor: usize,
    answered: Vec<bool>,
    score: u32,
    feedback: Feedback,
    state: SessionState,
    activated_at: DateTime<Utc>,
}

impl QuizSession {
    /// Bind a fresh session to `chapter` using the given traversal order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOrder` if `order` is not a permutation of
    /// the chapter's question indices.
    pub fn new(
        chapter: Arc<Chapter>,
        order: Vec<usize>,
        activated_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let n = chapter.len();
        if !is_permutation(&order, n) {
            return Err(SessionError::InvalidOrder { expected: n });
        }

        Ok(Self {
            chapter,
            order,
            cursor: 0,
            answered: vec![false; n],
            score: 0,
            feedback: Feedback::None,
            state: SessionState::InProgress,
            activated_at,
        })
    }

    #[must_use]
    pub fn chapter_id(&self) -> &ChapterId {
        self.chapter.id()
    }

    #[must_use]
    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// 0-based position into the traversal order.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::ChapterComplete
    }

    #[must_use]
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.activated_at
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.order.len()).unwrap_or(u32::MAX)
    }

    /// True when the chapter has no questions to show.
    #[must_use]
    pub fn has_no_content(&self) -> bool {
        self.order.is_empty()
    }

    /// Source index of the question under the cursor.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.chapter.question(i))
    }

    /// Whether the question at source index `index` has been solved.
    #[must_use]
    pub fn is_solved(&self, index: usize) -> bool {
        self.answered.get(index).copied().unwrap_or(false)
    }

    /// Check `letter` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` for a chapter without questions and
    /// `SessionError::Completed` once the chapter has been completed.
    pub fn submit_answer(&mut self, letter: AnswerLetter) -> Result<Feedback, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let idx = self.require_current()?;
        let correct = self.chapter.questions()[idx].is_correct(letter);

        self.feedback = if correct {
            if !self.answered[idx] {
                self.answered[idx] = true;
                self.score += 1;
            }
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };
        Ok(self.feedback)
    }

    /// Advance the cursor, or finish the chapter from the last position.
    ///
    /// Returns the `ChapterFinished` event the first time the chapter completes;
    /// later calls from the last position only re-show the completion message.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` for a chapter without questions.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<Option<ChapterFinished>, SessionError> {
        self.require_current()?;
        let last = self.order.len() - 1;

        if self.cursor < last {
            self.cursor += 1;
            self.feedback = Feedback::None;
            return Ok(None);
        }

        self.feedback = Feedback::ChapterComplete;
        if self.is_complete() {
            return Ok(None);
        }

        self.state = SessionState::ChapterComplete;
        Ok(Some(ChapterFinished {
            chapter_id: self.chapter.id().clone(),
            score: self.score,
            total_questions: self.total_questions(),
            finished_at: now,
        }))
    }

    /// Step back one question. Does not reopen a completed chapter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyChapter` for a chapter without questions.
    pub fn prev(&mut self) -> Result<(), SessionError> {
        self.require_current()?;
        if self.cursor > 0 {
            self.cursor -= 1;
            self.feedback = Feedback::None;
        }
        Ok(())
    }

    fn require_current(&self) -> Result<usize, SessionError> {
        self.current_index()
            .ok_or_else(|| SessionError::EmptyChapter(self.chapter.id().clone()))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("chapter_id", self.chapter.id())
            .field("questions", &self.order.len())
            .field("cursor", &self.cursor)
            .field("score", &self.score)
            .field("feedback", &self.feedback)
            .field("state", &self.state)
            .field("activated_at", &self.activated_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
