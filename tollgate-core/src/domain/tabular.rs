// tollgate-core/src/domain/tabular.rs

// Engine-neutral result set. Adapters convert their native rows into this
// shape so the domain never sees a driver type.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(v) => Some(*v),
            ScalarValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            ScalarValue::Boolean(b) => Some(i64::from(*b)),
            ScalarValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Integer(v) => Some(*v as f64),
            ScalarValue::Float(v) => Some(*v),
            ScalarValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "NULL"),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Integer(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::Text(v.to_string())
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularColumn {
    pub name: String,
    pub values: Vec<ScalarValue>,
}

/// Ordered columns, each a sequence of values of the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularResult {
    columns: Vec<TabularColumn>,
}

impl TabularResult {
    pub fn new(columns: Vec<TabularColumn>) -> Self {
        Self { columns }
    }

    /// Builds a columnar result from row-major data. Short rows are padded with NULL.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<ScalarValue>>) -> Self {
        let mut columns: Vec<TabularColumn> = names
            .into_iter()
            .map(|name| TabularColumn {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(ScalarValue::Null));
            }
        }

        Self { columns }
    }

    /// Convenience for single-value results (`SELECT COUNT(*) ...`).
    pub fn scalar(name: &str, value: ScalarValue) -> Self {
        Self::from_rows(vec![name.to_string()], vec![vec![value]])
    }

    pub fn columns(&self) -> &[TabularColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, index: usize) -> Option<&TabularColumn> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_by_name(&self, name: &str) -> Option<&TabularColumn> {
        self.column_index(name).and_then(|i| self.columns.get(i))
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&ScalarValue> {
        self.columns.get(column).and_then(|c| c.values.get(row))
    }

    /// Value of the first row in column `column`.
    pub fn first_value(&self, column: usize) -> Option<&ScalarValue> {
        self.value(0, column)
    }

    pub fn row(&self, row: usize) -> Vec<ScalarValue> {
        self.columns
            .iter()
            .map(|c| c.values.get(row).cloned().unwrap_or(ScalarValue::Null))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pads_short_rows() {
        let result = TabularResult::from_rows(
            vec!["id".into(), "email".into()],
            vec![
                vec![ScalarValue::Integer(1), "a@b.io".into()],
                vec![ScalarValue::Integer(2)],
            ],
        );

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.value(1, 1), Some(&ScalarValue::Null));
        assert_eq!(result.column_index("EMAIL"), Some(1));
    }

    #[test]
    fn test_scalar_coercions() {
        assert_eq!(ScalarValue::Text(" 42 ".into()).as_i64(), Some(42));
        assert_eq!(ScalarValue::Float(3.0).as_i64(), Some(3));
        assert_eq!(ScalarValue::Float(3.5).as_i64(), None);
        assert_eq!(ScalarValue::Integer(7).as_f64(), Some(7.0));
        assert!(ScalarValue::from(None::<i64>).is_null());
    }

    #[test]
    fn test_empty_result() {
        let result = TabularResult::from_rows(vec!["id".into()], vec![]);
        assert!(result.is_empty());
        assert_eq!(result.first_value(0), None);
    }
}
