use std::fmt;
use std::path::PathBuf;

use services::{JsonReportEncoder, PdfReportEncoder, ReportEncoder, ShuffleMode};

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingSource,
    InvalidSeed { raw: String },
    InvalidFormat { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingSource => {
                write!(f, "no question source given (use --source or QUIZ_SOURCE)")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid seed: {raw}"),
            ArgsError::InvalidFormat { raw } => {
                write!(f, "invalid report format: {raw} (expected pdf or json)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Pdf,
    Json,
}

impl ReportFormat {
    fn parse(raw: &str) -> Result<Self, ArgsError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            _ => Err(ArgsError::InvalidFormat {
                raw: raw.to_owned(),
            }),
        }
    }

    pub fn encoder(self) -> Box<dyn ReportEncoder> {
        match self {
            Self::Pdf => Box::new(PdfReportEncoder),
            Self::Json => Box::new(JsonReportEncoder),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub source: String,
    pub report_dir: PathBuf,
    pub shuffle: ShuffleMode,
    pub format: ReportFormat,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --source <path|url> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --source <path|url>     Question table (CSV)");
    eprintln!("  --report-dir <dir>      Where reports are written (default: .)");
    eprintln!("  --seed <u64>            Deterministic question order");
    eprintln!("  --no-shuffle            Present questions in source order");
    eprintln!("  --format <pdf|json>     Report format (default: pdf)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SOURCE, QUIZ_REPORT_DIR, QUIZ_SEED, QUIZ_NO_SHUFFLE,");
    eprintln!("  QUIZ_REPORT_FORMAT, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidSeed { raw })
}

impl QuizConfig {
    /// Resolve configuration from environment first, then command-line flags.
    ///
    /// Returns `Ok(None)` when `--help` was requested.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut source = env("QUIZ_SOURCE").filter(|s| !s.trim().is_empty());
        let mut report_dir =
            env("QUIZ_REPORT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from);
        let mut seed = env("QUIZ_SEED").map(parse_seed).transpose()?;
        let mut no_shuffle =
            env("QUIZ_NO_SHUFFLE").is_some_and(|v| matches!(v.trim(), "1" | "true"));
        let mut format = env("QUIZ_REPORT_FORMAT")
            .map(|raw| ReportFormat::parse(&raw))
            .transpose()?
            .unwrap_or_default();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--source" => source = Some(require_value(&mut args, "--source")?),
                "--report-dir" => {
                    report_dir = PathBuf::from(require_value(&mut args, "--report-dir")?);
                }
                "--seed" => seed = Some(parse_seed(require_value(&mut args, "--seed")?)?),
                "--no-shuffle" => no_shuffle = true,
                "--format" => format = ReportFormat::parse(&require_value(&mut args, "--format")?)?,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let shuffle = match (no_shuffle, seed) {
            (true, _) => ShuffleMode::Source,
            (false, Some(seed)) => ShuffleMode::Seeded(seed),
            (false, None) => ShuffleMode::Random,
        };

        Ok(Some(Self {
            source: source.ok_or(ArgsError::MissingSource)?,
            report_dir,
            shuffle,
            format,
        }))
    }
}
