// ********* Output data structures ***********

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::Display;

/// A question of the survey, with all the responses collected for it.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The responses, in the order of the rows of the export.
    pub options: Vec<String>,
    /// The kind of question (for example `likert` or `multiple_choice`).
    /// It is never set by the parser, only by a later annotation.
    #[serde(rename = "type")]
    pub question_type: Option<String>,
}

impl Question {
    pub fn new(options: Vec<String>) -> Question {
        Question {
            options,
            question_type: None,
        }
    }
}

/// Errors that prevent an export from being reshaped, or a question from being annotated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReshapeError {
    /// The content does not even contain a header row.
    EmptyInput,
    /// A record could not be read (bad quoting, content that is not UTF-8, ...).
    Csv { lineno: u64, message: String },
    /// Only returned in strict mode: a data row does not have as many cells as the header.
    RaggedRow {
        lineno: u64,
        expected: usize,
        found: usize,
    },
    QuestionNotFound { question: String },
}

impl Error for ReshapeError {}

impl Display for ReshapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReshapeError::EmptyInput => write!(f, "the CSV content has no header row"),
            ReshapeError::Csv { lineno, message } => {
                write!(f, "could not read the CSV record at line {}: {}", lineno, message)
            }
            ReshapeError::RaggedRow {
                lineno,
                expected,
                found,
            } => write!(
                f,
                "line {} has {} cells but the header has {}",
                lineno, found, expected
            ),
            ReshapeError::QuestionNotFound { question } => {
                write!(f, "question not found: {:?}", question)
            }
        }
    }
}

// ********* Configuration **********

/// Options that govern how an export is read.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// When false (the default), rows shorter than the header simply do not contribute to
    /// the missing columns, and cells beyond the header are dropped.
    /// When true, any row whose length differs from the header is rejected.
    pub strict: bool,
}

impl ParseOptions {
    pub const LENIENT: ParseOptions = ParseOptions { strict: false };
    pub const STRICT: ParseOptions = ParseOptions { strict: true };
}
