use quiz_core::model::{AnswerLetter, ChapterId, UserIdentity};

use super::service::{Feedback, QuizSession};

/// Percentage of `score` over `total`; defined as 0.0 for an empty chapter.
#[must_use]
pub fn score_percentage(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

/// One decimal place, e.g. `66.7%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub letter: AnswerLetter,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<OptionView>,
}

/// Everything the UI needs for one render cycle.
///
/// Presentation-agnostic: the UI decides how to lay this out and only calls
/// back into `QuizLoopService` for actions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub chapters: Vec<ChapterId>,
    pub active_chapter: Option<ChapterId>,
    pub question: Option<QuestionView>,
    /// 1-based position of the current question, 0 when nothing is shown.
    pub position: usize,
    pub total_questions: u32,
    pub feedback: Feedback,
    pub score: u32,
    pub is_complete: bool,
    pub no_content: bool,
    pub user_name: Option<String>,
}

impl QuizView {
    #[must_use]
    pub fn build(
        chapters: Vec<ChapterId>,
        session: Option<&QuizSession>,
        identity: Option<&UserIdentity>,
    ) -> Self {
        let question = session.and_then(QuizSession::current_question).map(|q| QuestionView {
            prompt: q.prompt().to_owned(),
            options: q
                .options()
                .map(|(letter, text)| OptionView {
                    letter,
                    text: text.to_owned(),
                })
                .collect(),
        });
        let position = match (session, &question) {
            (Some(s), Some(_)) => s.cursor() + 1,
            _ => 0,
        };

        Self {
            chapters,
            active_chapter: session.map(|s| s.chapter_id().clone()),
            question,
            position,
            total_questions: session.map_or(0, QuizSession::total_questions),
            feedback: session.map_or(Feedback::None, QuizSession::feedback),
            score: session.map_or(0, QuizSession::score),
            is_complete: session.is_some_and(QuizSession::is_complete),
            no_content: session.is_some_and(QuizSession::has_no_content),
            user_name: identity.map(|i| i.name().to_owned()),
        }
    }

    /// Fraction of the chapter reached, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.position as f64 / f64::from(self.total_questions)
    }

    /// `Question k / N`, empty when no question is shown.
    #[must_use]
    pub fn caption(&self) -> String {
        if self.question.is_none() {
            return String::new();
        }
        format!("Question {} / {}", self.position, self.total_questions)
    }

    #[must_use]
    pub fn feedback_text(&self) -> &'static str {
        self.feedback.message()
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        score_percentage(self.score, self.total_questions)
    }

    /// `Score: s / N (p%)`.
    #[must_use]
    pub fn score_line(&self) -> String {
        format!(
            "Score: {} / {} ({})",
            self.score,
            self.total_questions,
            format_percentage(self.percentage())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(score_percentage(2, 3)), "66.7%");
        assert_eq!(format_percentage(score_percentage(3, 3)), "100.0%");
    }

    #[test]
    fn empty_chapter_percentage_is_zero() {
        assert_eq!(score_percentage(0, 0), 0.0);
    }

    #[test]
    fn view_without_session_is_blank() {
        let view = QuizView::build(vec![ChapterId::new("Ch1")], None, None);
        assert!(view.question.is_none());
        assert_eq!(view.caption(), "");
        assert_eq!(view.progress(), 0.0);
        assert_eq!(view.score_line(), "Score: 0 / 0 (0.0%)");
        assert!(!view.no_content);
    }
}
