use std::fmt;

/// One line typed at the quiz prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chapters,
    Chapter(String),
    Answer(String),
    Next,
    Prev,
    Name(String),
    Report,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    MissingArgument(&'static str),
    Unknown(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type a command (help for a list)"),
            CommandError::MissingArgument(cmd) => write!(f, "{cmd} needs an argument"),
            CommandError::Unknown(word) => write!(f, "unknown command: {word}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let with_arg = |name: &'static str, build: fn(String) -> Command| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(build(rest.to_owned()))
        }
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "a" | "b" | "c" | "d" => Ok(Command::Answer(word.to_owned())),
        "answer" => with_arg("answer", Command::Answer),
        "chapter" => with_arg("chapter", Command::Chapter),
        "name" => with_arg("name", Command::Name),
        "chapters" => Ok(Command::Chapters),
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "report" => Ok(Command::Report),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(word.to_owned())),
    }
}

pub fn print_help() {
    println!("Commands:");
    println!("  a | b | c | d        answer the current question");
    println!("  next (n), prev (p)   move between questions");
    println!("  chapters             list chapters");
    println!("  chapter <label>      switch chapter");
    println!("  name <your name>     set the name used on reports");
    println!("  report               write a progress report");
    println!("  show                 redraw the current question");
    println!("  quit                 leave");
}
