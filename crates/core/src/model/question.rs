use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{ChapterId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("answer letter must be one of A, B, C, D (got {raw:?})")]
    InvalidLetter { raw: String },

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("option {letter} cannot be empty")]
    EmptyOption { letter: AnswerLetter },
}

//
// ─── ANSWER LETTER ─────────────────────────────────────────────────────────────
//

/// One of the four multiple-choice slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl FromStr for AnswerLetter {
    type Err = QuestionError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(QuestionError::InvalidLetter {
                raw: raw.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    chapter: ChapterId,
    prompt: String,
    options: [String; 4],
    correct: AnswerLetter,
}

impl Question {
    /// Builds a question, trimming prompt and options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` or `QuestionError::EmptyOption` for blank text.
    pub fn new(
        id: QuestionId,
        chapter: ChapterId,
        prompt: impl Into<String>,
        options: [String; 4],
        correct: AnswerLetter,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let options = options.map(|o| o.trim().to_owned());
        if let Some(letter) = AnswerLetter::ALL
            .into_iter()
            .find(|l| options[l.index()].is_empty())
        {
            return Err(QuestionError::EmptyOption { letter });
        }

        Ok(Self {
            id,
            chapter,
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn chapter(&self) -> &ChapterId {
        &self.chapter
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn option(&self, letter: AnswerLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Options paired with their letters, in A..D order.
    pub fn options(&self) -> impl Iterator<Item = (AnswerLetter, &str)> {
        AnswerLetter::ALL
            .into_iter()
            .map(|l| (l, self.options[l.index()].as_str()))
    }

    #[must_use]
    pub fn correct(&self) -> AnswerLetter {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, letter: AnswerLetter) -> bool {
        self.correct == letter
    }
}
