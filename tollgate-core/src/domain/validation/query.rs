// tollgate-core/src/domain/validation/query.rs

use serde::Serialize;
use std::fmt;

use crate::domain::tabular::{ScalarValue, TabularResult};
use crate::domain::validation::rule::ValidationType;

/// Column every generated query uses for its per-row violation message.
pub const ERROR_COLUMN: &str = "validation_error";

/// An executable query derived from a rule and a relation. Any row it
/// returns is a violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    validation_type: ValidationType,
    relation: String,
    sql: String,
}

impl QuerySpec {
    pub(crate) fn new(validation_type: ValidationType, relation: String, sql: String) -> Self {
        Self {
            validation_type,
            relation,
            sql,
        }
    }

    pub fn validation_type(&self) -> ValidationType {
        self.validation_type
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRow {
    pub values: Vec<ScalarValue>,
    pub message: String,
}

/// Rows returned by a validation query. Empty means the rule passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FailureSet {
    columns: Vec<String>,
    rows: Vec<FailureRow>,
}

impl FailureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Splits the message column from the context columns of every row.
    pub fn from_tabular(result: &TabularResult) -> Self {
        let message_idx = result.column_index(ERROR_COLUMN);

        let columns = result
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != message_idx)
            .map(|(_, c)| c.name.clone())
            .collect();

        let rows = (0..result.row_count())
            .map(|r| {
                let mut values = result.row(r);
                let message = match message_idx {
                    Some(i) => {
                        let raw = values.remove(i);
                        match raw {
                            ScalarValue::Null => "validation failed".to_string(),
                            other => other.to_string(),
                        }
                    }
                    None => "validation failed".to_string(),
                };
                FailureRow { values, message }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_pass(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[FailureRow] {
        &self.rows
    }

    /// Context value of `column` in failing row `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&ScalarValue> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))?;
        self.rows.get(row).and_then(|r| r.values.get(idx))
    }

    /// First `limit` violation messages, for logs and run artifacts.
    pub fn sample_messages(&self, limit: usize) -> Vec<String> {
        self.rows
            .iter()
            .take(limit)
            .map(|r| r.message.clone())
            .collect()
    }
}
