mod commands;
mod config;

use std::io::BufRead;

use quiz_core::Clock;
use quiz_core::model::ChapterId;
use services::{AppServices, LearnerContext, QuizLoopService, QuizView, ReportEncoder};
use storage::SourceLocation;

use commands::Command;
use config::{QuizConfig, print_usage};

fn render(view: &QuizView) {
    println!();
    match (&view.active_chapter, &view.question) {
        (None, _) => println!("No chapter selected. Type `chapters` to list them."),
        (Some(chapter), _) if view.no_content => {
            println!("[{chapter}] This chapter has no questions.");
        }
        (Some(chapter), Some(question)) => {
            println!("[{chapter}] {}", view.caption());
            println!("### {}", question.prompt);
            for option in &question.options {
                println!("  {}) {}", option.letter, option.text);
            }
        }
        (Some(chapter), None) => println!("[{chapter}]"),
    }
    if !view.feedback_text().is_empty() {
        println!("{}", view.feedback_text());
    }
    println!("{}", view.score_line());
}

fn handle(
    quiz: &QuizLoopService,
    learner: &mut LearnerContext,
    config: &QuizConfig,
    encoder: &dyn ReportEncoder,
    command: Command,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Command::Quit => return Ok(false),
        Command::Help => commands::print_help(),
        Command::Show => {}
        Command::Chapters => {
            for chapter in quiz.chapters() {
                println!("  {chapter}");
            }
            return Ok(true);
        }
        Command::Chapter(label) => {
            quiz.activate_chapter(learner, &ChapterId::new(label))?;
        }
        Command::Answer(letter) => {
            quiz.submit_answer(learner, &letter)?;
        }
        Command::Next => {
            quiz.next(learner)?;
        }
        Command::Prev => {
            quiz.prev(learner)?;
        }
        Command::Name(name) => {
            quiz.set_user_name(learner, &name)?;
            println!("Name set to {name}.");
            return Ok(true);
        }
        Command::Report => {
            let file = quiz.build_report(learner, encoder)?;
            std::fs::create_dir_all(&config.report_dir)?;
            let path = config.report_dir.join(&file.file_name);
            std::fs::write(&path, &file.bytes)?;
            log::info!("wrote {} bytes to {}", file.bytes.len(), path.display());
            println!("Report written to {} ({}).", path.display(), file.mime_type);
            return Ok(true);
        }
    }
    render(&quiz.view(learner));
    Ok(true)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(config) = QuizConfig::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|_| print_usage())?
    else {
        print_usage();
        return Ok(());
    };

    let source = SourceLocation::parse(&config.source).into_source();
    let mut services = AppServices::load(source, Clock::system(), config.shuffle).await?;
    let skipped = services.rejected_rows().len();
    if skipped > 0 {
        log::warn!("{skipped} question rows were skipped; the bank loaded without them");
    }

    let quiz = services.quiz_loop();
    let mut learner = services.new_learner();
    let encoder = config.format.encoder();

    if let Some(first) = quiz.chapters().first() {
        quiz.activate_chapter(&mut learner, first)?;
    }
    render(&quiz.view(&learner));

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match handle(&quiz, &mut learner, &config, encoder.as_ref(), command) {
            Ok(true) => {}
            Ok(false) => break,
            // Recoverable: show it inline and keep the session going.
            Err(err) => println!("{err}"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
