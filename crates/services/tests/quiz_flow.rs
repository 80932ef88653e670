use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::ChapterId;
use quiz_core::time::fixed_clock;
use quiz_core::{RandomShuffle, SourceOrder};
use services::{
    Feedback, JsonReportEncoder, LearnerContext, PdfReportEncoder, QuizLoopService, ReportError,
    SessionState,
};
use storage::{InMemorySource, QuestionBankCache};

const TABLE: &str = "Chapter,Question,OptionA,OptionB,OptionC,OptionD,Answer\n\
                     Ch1,First?,a,b,c,d,A\n\
                     Ch1,Second?,a,b,c,d,C\n\
                     Ch1,Third?,a,b,c,d,B\n\
                     Ch2,Only?,a,b,c,d,d\n";

async fn quiz_loop() -> QuizLoopService {
    let cache = QuestionBankCache::new(Box::new(InMemorySource::new(TABLE)));
    let bank = Arc::clone(&cache.get_or_load().await.unwrap().bank);
    QuizLoopService::new(fixed_clock(), bank)
}

#[tokio::test]
async fn answering_a_chapter_in_order_records_full_score() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    let ch1 = ChapterId::new("Ch1");
    svc.activate_chapter(&mut learner, &ch1).unwrap();

    let mut finished = Vec::new();
    for letter in ["A", "C", "B"] {
        assert_eq!(svc.submit_answer(&mut learner, letter).unwrap(), Feedback::Correct);
        finished.extend(svc.next(&mut learner).unwrap().finished);
    }

    let session = learner.session().unwrap();
    assert_eq!(session.score(), 3);
    assert_eq!(session.state(), SessionState::ChapterComplete);
    assert_eq!(finished.len(), 1);

    let record = learner.ledger().get(&ch1).unwrap();
    assert_eq!(record.final_score(), 3);
    assert_eq!(record.total_questions(), 3);
    assert!(record.is_completed());
    assert_eq!(svc.view(&learner).score_line(), "Score: 3 / 3 (100.0%)");
}

#[tokio::test]
async fn wrong_then_right_counts_once() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    svc.activate_chapter(&mut learner, &ChapterId::new("Ch1")).unwrap();

    assert_eq!(svc.submit_answer(&mut learner, "b").unwrap(), Feedback::Incorrect);
    assert_eq!(svc.view(&learner).feedback_text(), "Try again");
    assert_eq!(svc.submit_answer(&mut learner, " a ").unwrap(), Feedback::Correct);
    assert_eq!(svc.submit_answer(&mut learner, "A").unwrap(), Feedback::Correct);
    assert_eq!(learner.session().unwrap().score(), 1);
}

#[tokio::test]
async fn shuffled_traversal_still_completes_once() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(RandomShuffle::seeded(3)));
    let ch1 = ChapterId::new("Ch1");
    svc.activate_chapter(&mut learner, &ch1).unwrap();

    let mut completions = 0;
    for step in 0..3 {
        if step > 0 {
            svc.prev(&mut learner).unwrap();
            svc.next(&mut learner).unwrap();
        }
        let correct = learner.session().unwrap().current_question().unwrap().correct();
        svc.submit_answer(&mut learner, &correct.to_string()).unwrap();
        if svc.next(&mut learner).unwrap().finished.is_some() {
            completions += 1;
        }
    }

    svc.prev(&mut learner).unwrap();
    for _ in 0..3 {
        if svc.next(&mut learner).unwrap().finished.is_some() {
            completions += 1;
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(learner.ledger().get(&ch1).unwrap().final_score(), 3);
}

#[tokio::test]
async fn view_tracks_position_and_progress() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    svc.activate_chapter(&mut learner, &ChapterId::new("Ch1")).unwrap();
    svc.next(&mut learner).unwrap();

    let view = svc.view(&learner);
    assert_eq!(view.caption(), "Question 2 / 3");
    assert!((view.progress() - 2.0 / 3.0).abs() < f64::EPSILON);
    assert_eq!(view.question.as_ref().unwrap().prompt, "Second?");
    assert_eq!(view.question.as_ref().unwrap().options.len(), 4);
    assert_eq!(view.chapters, vec![ChapterId::new("Ch1"), ChapterId::new("Ch2")]);
}

#[tokio::test]
async fn repeated_completion_overwrites_ledger_entry() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    let ch1 = ChapterId::new("Ch1");
    let ch2 = ChapterId::new("Ch2");

    svc.activate_chapter(&mut learner, &ch1).unwrap();
    for _ in 0..3 {
        svc.next(&mut learner).unwrap();
    }
    assert_eq!(learner.ledger().get(&ch1).unwrap().final_score(), 0);

    svc.activate_chapter(&mut learner, &ch2).unwrap();
    svc.activate_chapter(&mut learner, &ch1).unwrap();
    svc.submit_answer(&mut learner, "A").unwrap();
    for _ in 0..3 {
        svc.next(&mut learner).unwrap();
    }

    assert_eq!(learner.ledger().len(), 2);
    assert_eq!(learner.ledger().get(&ch1).unwrap().final_score(), 1);
    assert!(!learner.ledger().get(&ch2).unwrap().is_completed());
}

#[tokio::test]
async fn report_requires_name_then_lists_chapters() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));

    assert!(matches!(
        svc.build_report(&learner, &JsonReportEncoder),
        Err(ReportError::MissingUserName)
    ));

    svc.set_user_name(&mut learner, "Kim").unwrap();
    let empty = svc.build_report(&learner, &JsonReportEncoder).unwrap();
    let text = String::from_utf8(empty.bytes).unwrap();
    assert!(text.contains("Kim"));
    assert!(text.contains("\"chapters\": []"));
    assert_eq!(empty.file_name, "Kim_quiz_report.json");

    svc.activate_chapter(&mut learner, &ChapterId::new("Ch2")).unwrap();
    svc.submit_answer(&mut learner, "D").unwrap();
    svc.next(&mut learner).unwrap();

    let pdf = svc.build_report(&learner, &PdfReportEncoder).unwrap();
    assert_eq!(pdf.file_name, "Kim_quiz_report.pdf");
    assert_eq!(pdf.mime_type, "application/pdf");
    assert!(pdf.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn non_latin_name_fails_pdf_but_survives_json() {
    let svc = quiz_loop().await;
    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    svc.set_user_name(&mut learner, "김민수").unwrap();
    svc.activate_chapter(&mut learner, &ChapterId::new("Ch2")).unwrap();

    assert!(matches!(
        svc.build_report(&learner, &PdfReportEncoder),
        Err(ReportError::UnsupportedText { character: '김', .. })
    ));

    let json = svc.build_report(&learner, &JsonReportEncoder).unwrap();
    assert_eq!(json.file_name, "김민수_quiz_report.json");
    assert!(String::from_utf8(json.bytes).unwrap().contains("김민수"));
}

#[tokio::test]
async fn completion_time_comes_from_the_clock() {
    let cache = QuestionBankCache::new(Box::new(InMemorySource::new(TABLE)));
    let bank = Arc::clone(&cache.get_or_load().await.unwrap().bank);
    let mut clock = fixed_clock();
    let started = clock.now();

    let mut learner = LearnerContext::new(Box::new(SourceOrder));
    let ch2 = ChapterId::new("Ch2");
    QuizLoopService::new(clock, Arc::clone(&bank))
        .activate_chapter(&mut learner, &ch2)
        .unwrap();

    clock.advance(Duration::minutes(3));
    QuizLoopService::new(clock, bank).next(&mut learner).unwrap();

    let record = learner.ledger().get(&ch2).unwrap();
    assert_eq!(record.started_at(), started);
    assert_eq!(record.completed_at(), Some(started + Duration::minutes(3)));
}
