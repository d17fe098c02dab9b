use log::{debug, warn};

pub use crate::config::*;
use crate::QuestionStore;

/// Collects the cells of an export column by column.
///
/// The columns are identified by their position in the header, which holds opaque
/// identifiers. The human-readable question text only appears as the first value of each
/// column, so nothing can be keyed by question until all the rows have been seen.
///
/// ```
/// use question_store::builder::ColumnAccumulator;
/// use question_store::ParseOptions;
///
/// let mut acc = ColumnAccumulator::new(vec!["QID1".to_string()], &ParseOptions::default());
/// acc.push_row(2, &["Are you 18+?"])?;
/// acc.push_row(3, &["Yes"])?;
///
/// let store = acc.finish();
/// assert_eq!(store.get("Are you 18+?").unwrap().options, vec!["Yes".to_string()]);
/// # Ok::<(), question_store::ReshapeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ColumnAccumulator {
    header: Vec<String>,
    columns: Vec<Vec<String>>,
    options: ParseOptions,
}

impl ColumnAccumulator {
    pub fn new(header: Vec<String>, options: &ParseOptions) -> ColumnAccumulator {
        let columns = vec![Vec::new(); header.len()];
        ColumnAccumulator {
            header,
            columns,
            options: *options,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Appends the cells of one data row to their columns.
    ///
    /// `lineno` is only used for reporting.
    pub fn push_row(&mut self, lineno: u64, row: &[&str]) -> Result<(), ReshapeError> {
        if row.len() != self.header.len() {
            if self.options.strict {
                return Err(ReshapeError::RaggedRow {
                    lineno,
                    expected: self.header.len(),
                    found: row.len(),
                });
            }
            debug!(
                "push_row: line {} has {} cells, header has {}",
                lineno,
                row.len(),
                self.header.len()
            );
        }
        // Short rows leave the trailing columns untouched, extra cells are dropped.
        for (column, cell) in self.columns.iter_mut().zip(row.iter()) {
            column.push(cell.to_string());
        }
        Ok(())
    }

    /// Rekeys every column by its first value and builds the final store.
    ///
    /// Columns without any value, or whose first value is empty, are dropped. When two
    /// columns carry the same question text, the later one wins but the entry keeps the
    /// position of the first one.
    pub fn finish(self) -> QuestionStore {
        let mut store = QuestionStore::new();
        for (column_id, values) in self.header.iter().zip(self.columns) {
            let mut values = values.into_iter();
            let question_text = match values.next() {
                Some(text) if !text.is_empty() => text,
                Some(_) => {
                    debug!("finish: column {:?} has no question text", column_id);
                    continue;
                }
                None => {
                    debug!("finish: column {:?} is empty", column_id);
                    continue;
                }
            };
            let question = Question::new(values.collect());
            if store.insert(question_text.clone(), question).is_some() {
                warn!(
                    "Column {:?} replaces an earlier column with the same question {:?}",
                    column_id, question_text
                );
            }
        }
        store
    }
}
