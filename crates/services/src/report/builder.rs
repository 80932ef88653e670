use chrono::{DateTime, Utc};
use serde::Serialize;

use quiz_core::Clock;
use quiz_core::model::{ChapterRecord, UserIdentity};
use quiz_core::time::format_timestamp;

use crate::error::ReportError;
use crate::sessions::{ProgressLedger, format_percentage, score_percentage};

pub const REPORT_TITLE: &str = "Quiz Progress Report";

/// One chapter's entry in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterBlock {
    pub chapter: String,
    pub completed: bool,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChapterBlock {
    #[must_use]
    pub fn from_record(record: &ChapterRecord) -> Self {
        Self {
            chapter: record.chapter_id().to_string(),
            completed: record.is_completed(),
            score: record.final_score(),
            total_questions: record.total_questions(),
            percentage: score_percentage(record.final_score(), record.total_questions()),
            started_at: record.started_at(),
            completed_at: record.completed_at(),
        }
    }
}

/// A line of rendered report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub text: String,
    pub heading: bool,
}

impl ReportLine {
    fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: true,
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            heading: false,
        }
    }
}

/// Format-independent report content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub user_name: String,
    pub generated_at: DateTime<Utc>,
    pub chapters: Vec<ChapterBlock>,
}

impl ReportDocument {
    /// Text layout shared by the encoders: header, then one block per chapter.
    #[must_use]
    pub fn lines(&self) -> Vec<ReportLine> {
        let mut lines = vec![
            ReportLine::heading(self.title.clone()),
            ReportLine::body(format!("User: {}", self.user_name)),
            ReportLine::body(format!("Generated: {}", format_timestamp(self.generated_at))),
        ];

        for block in &self.chapters {
            lines.push(ReportLine::body(""));
            lines.push(ReportLine::heading(format!("Chapter: {}", block.chapter)));
            lines.push(ReportLine::body(format!(
                "Completed: {}",
                if block.completed { "Yes" } else { "No" }
            )));
            lines.push(ReportLine::body(format!(
                "Score: {} / {} ({})",
                block.score,
                block.total_questions,
                format_percentage(block.percentage)
            )));
            lines.push(ReportLine::body(format!(
                "Started: {}",
                format_timestamp(block.started_at)
            )));
            lines.push(ReportLine::body(format!(
                "Finished: {}",
                block
                    .completed_at
                    .map_or_else(|| "N/A".to_owned(), format_timestamp)
            )));
        }
        lines
    }

    /// Plain-text rendering of [`ReportDocument::lines`].
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Snapshots a ledger and identity into a `ReportDocument`.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    clock: Clock,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// # Errors
    ///
    /// Returns `ReportError::MissingUserName` when no identity is set.
    pub fn build(
        &self,
        identity: Option<&UserIdentity>,
        ledger: &ProgressLedger,
    ) -> Result<ReportDocument, ReportError> {
        let identity = identity.ok_or(ReportError::MissingUserName)?;
        Ok(ReportDocument {
            title: REPORT_TITLE.to_owned(),
            user_name: identity.name().to_owned(),
            generated_at: self.clock.now(),
            chapters: ledger.records().iter().map(ChapterBlock::from_record).collect(),
        })
    }
}
