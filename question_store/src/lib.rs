mod config;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub use crate::config::*;

pub mod builder;
pub mod manual;

use crate::builder::ColumnAccumulator;

/// All the questions of an export, keyed by their text.
///
/// The questions keep the order of the columns in the export. The JSON form is a plain
/// object: `{"question text": {"options": [...], "type": null}}`.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionStore {
    questions: IndexMap<String, Question>,
}

impl QuestionStore {
    pub fn new() -> QuestionStore {
        QuestionStore::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, question: &str) -> Option<&Question> {
        self.questions.get(question)
    }

    /// The question texts, in column order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(|k| k.as_str())
    }

    pub fn questions(&self) -> impl Iterator<Item = (&str, &Question)> {
        self.questions.iter().map(|(k, q)| (k.as_str(), q))
    }

    /// Annotates a question with a type. Any string is accepted as a type.
    ///
    /// Only the `type` of the given question changes. If the question does not exist, the
    /// store is left as is.
    pub fn set_type(
        &mut self,
        question: &str,
        question_type: &str,
    ) -> Result<&Question, ReshapeError> {
        match self.questions.get_mut(question) {
            Some(q) => {
                debug!("set_type: {:?} -> {:?}", question, question_type);
                q.question_type = Some(question_type.to_string());
                Ok(&*q)
            }
            None => Err(ReshapeError::QuestionNotFound {
                question: question.to_string(),
            }),
        }
    }

    pub(crate) fn insert(&mut self, text: String, question: Question) -> Option<Question> {
        self.questions.insert(text, question)
    }
}

/// Reads a survey export and reshapes it into a store of questions.
///
/// Arguments:
/// * `content` the raw bytes of the export, comma separated and UTF-8 encoded
/// * `options` the policy for rows that do not match the header
///
/// The first row holds the internal column identifiers and is only used to count the
/// columns. The first value under each column (the second row, in a well-formed export)
/// is the question text, the following values are the responses.
///
/// ```
/// use question_store::{parse, ParseOptions};
///
/// let export = "QID1,QID2\nAre you 18+?,Favorite color?\nYes,Blue\nNo,Red\n";
/// let store = parse(export.as_bytes(), &ParseOptions::default())?;
///
/// assert_eq!(store.keys().collect::<Vec<_>>(), vec!["Are you 18+?", "Favorite color?"]);
/// assert_eq!(store.get("Favorite color?").unwrap().options, vec!["Blue", "Red"]);
/// # Ok::<(), question_store::ReshapeError>(())
/// ```
pub fn parse(content: &[u8], options: &ParseOptions) -> Result<QuestionStore, ReshapeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(csv_error)?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return Err(ReshapeError::EmptyInput),
    };
    debug!("parse: header: {:?}", header);

    let mut acc = ColumnAccumulator::new(header, options);
    let mut num_rows: usize = 0;
    for record in records {
        let record = record.map_err(csv_error)?;
        let lineno = record.position().map(|p| p.line()).unwrap_or(0);
        let cells: Vec<&str> = record.iter().collect();
        acc.push_row(lineno, &cells)?;
        num_rows += 1;
    }

    let store = acc.finish();
    info!(
        "Parsed {} data rows into {} questions",
        num_rows,
        store.len()
    );
    Ok(store)
}

fn csv_error(err: csv::Error) -> ReshapeError {
    ReshapeError::Csv {
        lineno: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}
