use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::ShuffleOrder;
use quiz_core::model::{
    AnswerLetter, ChapterId, ChapterRecord, IdentityError, LearnerId, UserIdentity,
};
use storage::QuestionBank;

use super::progress::ProgressLedger;
use super::service::{Feedback, QuizSession};
use super::view::QuizView;
use crate::error::{ReportError, SessionError};
use crate::report::{ReportBuilder, ReportEncoder, ReportFile};

//
// ─── LEARNER CONTEXT ───────────────────────────────────────────────────────────
//

/// Per-user state: identity, the active session and the progress ledger.
///
/// Contexts share nothing mutable with each other. Each owns its shuffle
/// source so traversal orders are independent between users.
pub struct LearnerContext {
    id: LearnerId,
    identity: Option<UserIdentity>,
    session: Option<QuizSession>,
    ledger: ProgressLedger,
    shuffle: Box<dyn ShuffleOrder>,
}

impl LearnerContext {
    #[must_use]
    pub fn new(shuffle: Box<dyn ShuffleOrder>) -> Self {
        Self {
            id: LearnerId::new_random(),
            identity: None,
            session: None,
            ledger: ProgressLedger::new(),
            shuffle,
        }
    }

    #[must_use]
    pub fn id(&self) -> LearnerId {
        self.id
    }

    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoActiveChapter)
    }
}

impl fmt::Debug for LearnerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearnerContext")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("session", &self.session)
            .field("ledger_len", &self.ledger.len())
            .finish_non_exhaustive()
    }
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Outcome of binding a learner to a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A new session with a fresh traversal order.
    Started,
    /// The chapter was already active; progress is untouched.
    Resumed,
}

/// Result of a `next`/`prev` action.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationResult {
    pub cursor: usize,
    pub feedback: Feedback,
    pub is_complete: bool,
    /// Updated ledger record, present only when this action finished the chapter.
    pub finished: Option<ChapterRecord>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Action handlers behind the UI hooks.
///
/// Each call runs one transition to completion against a single
/// `LearnerContext`. The bank is shared read-only.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    reports: ReportBuilder,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            reports: ReportBuilder::new(clock),
        }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn chapters(&self) -> Vec<ChapterId> {
        self.bank.chapter_ids().cloned().collect()
    }

    /// Bind the learner to `chapter_id`.
    ///
    /// Switching to a different chapter discards the previous session and
    /// reshuffles; re-activating the current chapter is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownChapter` if the bank has no such chapter.
    pub fn activate_chapter(
        &self,
        learner: &mut LearnerContext,
        chapter_id: &ChapterId,
    ) -> Result<Activation, SessionError> {
        if learner
            .session
            .as_ref()
            .is_some_and(|s| s.chapter_id() == chapter_id)
        {
            return Ok(Activation::Resumed);
        }

        let chapter = self
            .bank
            .chapter(chapter_id)
            .ok_or_else(|| SessionError::UnknownChapter(chapter_id.clone()))?;
        let now = self.clock.now();
        let order = learner.shuffle.shuffle(chapter.len());
        let session = QuizSession::new(chapter, order, now)?;

        learner
            .ledger
            .ensure_record(chapter_id, session.total_questions(), now);
        log::debug!(
            "learner {} activated chapter {} ({} questions)",
            learner.id,
            chapter_id,
            session.total_questions()
        );
        learner.session = Some(session);
        Ok(Activation::Started)
    }

    /// Submit a raw answer letter (`"a"`, `" B "`, ...) for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidLetter` for anything but A–D, and the
    /// session's state errors otherwise.
    pub fn submit_answer(
        &self,
        learner: &mut LearnerContext,
        raw_letter: &str,
    ) -> Result<Feedback, SessionError> {
        let letter: AnswerLetter = raw_letter.parse()?;
        learner.session_mut()?.submit_answer(letter)
    }

    /// Move forward; on the last question this completes the chapter and
    /// records the completion in the learner's ledger (once per activation).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no chapter is active or it has no questions.
    pub fn next(&self, learner: &mut LearnerContext) -> Result<NavigationResult, SessionError> {
        let now = self.clock.now();
        let session = learner.session.as_mut().ok_or(SessionError::NoActiveChapter)?;
        let event = session.next(now)?;

        let finished = match event {
            Some(event) => {
                let record = learner.ledger.apply(&event)?.clone();
                log::info!(
                    "learner {} completed chapter {} with {}/{}",
                    learner.id,
                    event.chapter_id,
                    event.score,
                    event.total_questions
                );
                Some(record)
            }
            None => None,
        };

        Ok(Self::navigation(learner, finished))
    }

    /// Move back one question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if no chapter is active or it has no questions.
    pub fn prev(&self, learner: &mut LearnerContext) -> Result<NavigationResult, SessionError> {
        learner.session_mut()?.prev()?;
        Ok(Self::navigation(learner, None))
    }

    /// Set (or replace) the learner's display name.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::EmptyName` for a blank name; the previous name is kept.
    pub fn set_user_name(
        &self,
        learner: &mut LearnerContext,
        name: &str,
    ) -> Result<(), IdentityError> {
        learner.identity = Some(UserIdentity::new(name)?);
        Ok(())
    }

    /// Snapshot for the current render cycle.
    #[must_use]
    pub fn view(&self, learner: &LearnerContext) -> QuizView {
        QuizView::build(
            self.chapters(),
            learner.session.as_ref(),
            learner.identity.as_ref(),
        )
    }

    /// Render the learner's progress with the given encoder.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MissingUserName` until a name has been set, or
    /// the encoder's failure.
    pub fn build_report(
        &self,
        learner: &LearnerContext,
        encoder: &dyn ReportEncoder,
    ) -> Result<ReportFile, ReportError> {
        let document = self
            .reports
            .build(learner.identity.as_ref(), &learner.ledger)?;
        ReportFile::encode(&document, encoder)
    }

    fn navigation(learner: &LearnerContext, finished: Option<ChapterRecord>) -> NavigationResult {
        let (cursor, feedback, is_complete) = learner
            .session
            .as_ref()
            .map_or((0, Feedback::None, false), |s| {
                (s.cursor(), s.feedback(), s.is_complete())
            });
        NavigationResult {
            cursor,
            feedback,
            is_complete,
            finished,
        }
    }
}

impl fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("chapters", &self.bank.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::SourceOrder;
    use quiz_core::model::{Chapter, Question, QuestionId};
    use quiz_core::time::fixed_clock;

    /// Rotates the identity by the call count so consecutive activations differ.
    struct RotatingOrder {
        calls: usize,
    }

    impl ShuffleOrder for RotatingOrder {
        fn shuffle(&mut self, n: usize) -> Vec<usize> {
            self.calls += 1;
            let mut order: Vec<usize> = (0..n).collect();
            if n > 0 {
                order.rotate_left(self.calls % n);
            }
            order
        }
    }

    fn chapter(label: &str, answers: &[AnswerLetter]) -> Chapter {
        let id = ChapterId::new(label);
        let questions = answers
            .iter()
            .enumerate()
            .map(|(i, &letter)| {
                Question::new(
                    QuestionId::new(i as u32),
                    id.clone(),
                    format!("{label} Q{i}"),
                    ["a".into(), "b".into(), "c".into(), "d".into()],
                    letter,
                )
                .unwrap()
            })
            .collect();
        Chapter::new(id, questions)
    }

    fn service() -> QuizLoopService {
        use AnswerLetter::{A, B, C};
        let bank = QuestionBank::new([
            chapter("Ch1", &[A, C, B]),
            chapter("Ch2", &[B, B]),
            chapter("Empty", &[]),
        ]);
        QuizLoopService::new(fixed_clock(), Arc::new(bank))
    }

    #[test]
    fn actions_without_chapter_are_state_errors() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        assert_eq!(
            svc.submit_answer(&mut learner, "A").unwrap_err(),
            SessionError::NoActiveChapter
        );
        assert_eq!(svc.next(&mut learner).unwrap_err(), SessionError::NoActiveChapter);
        assert_eq!(svc.prev(&mut learner).unwrap_err(), SessionError::NoActiveChapter);
    }

    #[test]
    fn reactivating_same_chapter_keeps_progress() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        let ch1 = ChapterId::new("Ch1");

        assert_eq!(svc.activate_chapter(&mut learner, &ch1).unwrap(), Activation::Started);
        svc.submit_answer(&mut learner, "a").unwrap();
        svc.next(&mut learner).unwrap();

        assert_eq!(svc.activate_chapter(&mut learner, &ch1).unwrap(), Activation::Resumed);
        let session = learner.session().unwrap();
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn switching_chapters_reshuffles_and_keeps_records() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(RotatingOrder { calls: 0 }));
        let ch1 = ChapterId::new("Ch1");
        let ch2 = ChapterId::new("Ch2");

        svc.activate_chapter(&mut learner, &ch1).unwrap();
        let first_order = learner.session().unwrap().order().to_vec();
        svc.submit_answer(&mut learner, "A").unwrap();
        for _ in 0..3 {
            svc.next(&mut learner).unwrap();
        }
        assert!(learner.ledger().get(&ch1).unwrap().is_completed());

        svc.activate_chapter(&mut learner, &ch2).unwrap();
        svc.activate_chapter(&mut learner, &ch1).unwrap();

        let session = learner.session().unwrap();
        assert_ne!(session.order(), first_order.as_slice());
        assert_eq!(session.score(), 0);
        assert_eq!(session.cursor(), 0);
        assert!(!session.is_complete());

        assert_eq!(learner.ledger().len(), 2);
        assert!(learner.ledger().get(&ch1).unwrap().is_completed());
        assert!(!learner.ledger().get(&ch2).unwrap().is_completed());
    }

    #[test]
    fn unknown_chapter_creates_no_record() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        let err = svc
            .activate_chapter(&mut learner, &ChapterId::new("Nope"))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownChapter(ChapterId::new("Nope")));
        assert!(learner.ledger().is_empty());
        assert!(learner.session().is_none());
    }

    #[test]
    fn invalid_letter_is_rejected_without_changing_feedback() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        svc.activate_chapter(&mut learner, &ChapterId::new("Ch1")).unwrap();
        assert!(matches!(
            svc.submit_answer(&mut learner, "E"),
            Err(SessionError::InvalidLetter(_))
        ));
        assert_eq!(learner.session().unwrap().feedback(), Feedback::None);
    }

    #[test]
    fn empty_chapter_renders_no_content() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        svc.activate_chapter(&mut learner, &ChapterId::new("Empty")).unwrap();

        let view = svc.view(&learner);
        assert!(view.no_content);
        assert!(view.question.is_none());
        assert_eq!(view.percentage(), 0.0);
        assert!(matches!(
            svc.next(&mut learner),
            Err(SessionError::EmptyChapter(_))
        ));
        assert_eq!(learner.ledger().len(), 1);
    }

    #[test]
    fn blank_name_keeps_previous_identity() {
        let svc = service();
        let mut learner = LearnerContext::new(Box::new(SourceOrder));
        svc.set_user_name(&mut learner, "Kim").unwrap();
        assert_eq!(
            svc.set_user_name(&mut learner, "  ").unwrap_err(),
            IdentityError::EmptyName
        );
        assert_eq!(learner.identity().unwrap().name(), "Kim");
    }

    #[test]
    fn learners_are_isolated() {
        let svc = service();
        let mut kim = LearnerContext::new(Box::new(SourceOrder));
        let mut lee = LearnerContext::new(Box::new(SourceOrder));
        let ch1 = ChapterId::new("Ch1");

        svc.activate_chapter(&mut kim, &ch1).unwrap();
        svc.submit_answer(&mut kim, "A").unwrap();

        assert!(lee.session().is_none());
        svc.activate_chapter(&mut lee, &ch1).unwrap();
        assert_eq!(lee.session().unwrap().score(), 0);
        assert_eq!(kim.session().unwrap().score(), 1);
        assert_ne!(kim.id(), lee.id());
    }
}
