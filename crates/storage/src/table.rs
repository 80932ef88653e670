//! CSV question table parsing.
//!
//! Expected header: `Chapter, Question, OptionA, OptionB, OptionC, OptionD, Answer`.
//! Column order is free and extra columns are ignored.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use quiz_core::model::{AnswerLetter, Chapter, ChapterId, Question, QuestionId};

use crate::bank::{LoadReport, QuestionBank};
use crate::error::{DataLoadError, RowRejection, ValidationError};

const REQUIRED_COLUMNS: [&str; 7] = [
    "Chapter", "Question", "OptionA", "OptionB", "OptionC", "OptionD", "Answer",
];

/// Row payload; the chapter label is read by column position beforehand.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "OptionA")]
    option_a: String,
    #[serde(rename = "OptionB")]
    option_b: String,
    #[serde(rename = "OptionC")]
    option_c: String,
    #[serde(rename = "OptionD")]
    option_d: String,
    #[serde(rename = "Answer")]
    answer: String,
}

#[derive(Default)]
struct ChapterDraft {
    questions: Vec<Question>,
    prompts: HashSet<String>,
}

/// Parse the question table, skipping invalid rows.
///
/// A chapter label is listed as soon as it is seen, even when every row for
/// it is rejected; such chapters load with zero questions.
///
/// # Errors
///
/// Returns `DataLoadError::MissingColumn` if a required header is absent,
/// `DataLoadError::Malformed` if the CSV cannot be read, and
/// `DataLoadError::NoChapters` if no row names a chapter.
pub fn parse_question_table(text: &str) -> Result<LoadReport, DataLoadError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(DataLoadError::MissingColumn(missing));
    }

    let mut order: Vec<ChapterId> = Vec::new();
    let mut drafts: HashMap<ChapterId, ChapterDraft> = HashMap::new();
    let mut rejected = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);

        if let Err(reason) = accept_row(&record, &headers, &mut order, &mut drafts) {
            log::warn!("skipping question row {line}: {reason}");
            rejected.push(ValidationError { line, reason });
        }
    }

    if order.is_empty() {
        return Err(DataLoadError::NoChapters);
    }

    let chapters = order.into_iter().map(|id| {
        let questions = drafts.remove(&id).map(|d| d.questions).unwrap_or_default();
        Chapter::new(id, questions)
    });
    let bank = QuestionBank::new(chapters);

    log::info!(
        "loaded {} questions in {} chapters ({} rows skipped)",
        bank.question_count(),
        bank.len(),
        rejected.len()
    );

    Ok(LoadReport {
        bank: Arc::new(bank),
        rejected,
    })
}

fn accept_row(
    record: &StringRecord,
    headers: &StringRecord,
    order: &mut Vec<ChapterId>,
    drafts: &mut HashMap<ChapterId, ChapterDraft>,
) -> Result<(), RowRejection> {
    let chapter_label = headers
        .iter()
        .position(|h| h == "Chapter")
        .and_then(|i| record.get(i))
        .unwrap_or_default();
    if chapter_label.is_empty() {
        return Err(RowRejection::MissingChapter);
    }

    let chapter = ChapterId::new(chapter_label);
    let draft = drafts.entry(chapter.clone()).or_insert_with(|| {
        order.push(chapter.clone());
        ChapterDraft::default()
    });

    let row: RawRow = record
        .deserialize(Some(headers))
        .map_err(|e| RowRejection::Unreadable(e.to_string()))?;

    let correct: AnswerLetter = row.answer.parse()?;
    let id = QuestionId::new(u32::try_from(draft.questions.len()).unwrap_or(u32::MAX));
    let question = Question::new(
        id,
        chapter.clone(),
        row.question,
        [row.option_a, row.option_b, row.option_c, row.option_d],
        correct,
    )?;

    if !draft.prompts.insert(question.prompt().to_owned()) {
        return Err(RowRejection::Duplicate(chapter));
    }
    draft.questions.push(question);
    Ok(())
}
