// tollgate-core/src/domain/quality/config.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

pub const DEFAULT_NULL_THRESHOLD_PCT: f64 = 5.0;

fn default_null_threshold() -> f64 {
    DEFAULT_NULL_THRESHOLD_PCT
}

/// Which aggregate checks run against one relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QualityCheckConfig {
    #[serde(default)]
    #[validate(custom(function = "validate_column_names"))]
    pub null_check_columns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "duplicate_check column cannot be empty"))]
    pub duplicate_check: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "date_range_check column cannot be empty"))]
    pub date_range_check: Option<String>,

    /// Null percentage at or above which a column fails.
    #[serde(default = "default_null_threshold")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub null_threshold_pct: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub min_rows: Option<u64>,
}

impl Default for QualityCheckConfig {
    fn default() -> Self {
        Self {
            null_check_columns: Vec::new(),
            duplicate_check: None,
            date_range_check: None,
            null_threshold_pct: DEFAULT_NULL_THRESHOLD_PCT,
            min_rows: None,
        }
    }
}

impl QualityCheckConfig {
    pub fn with_null_checks<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_check_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duplicate_check(mut self, column: impl Into<String>) -> Self {
        self.duplicate_check = Some(column.into());
        self
    }

    pub fn with_date_range_check(mut self, column: impl Into<String>) -> Self {
        self.date_range_check = Some(column.into());
        self
    }

    pub fn with_min_rows(mut self, min_rows: u64) -> Self {
        self.min_rows = Some(min_rows);
        self
    }

    /// Runs the `validator` rules and maps failures to a domain error.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::QualityConfig(e.to_string().replace('\n', "; ")))
    }
}

fn validate_column_names(columns: &[String]) -> Result<(), validator::ValidationError> {
    if columns.iter().any(|c| c.trim().is_empty()) {
        let mut err = validator::ValidationError::new("empty_column");
        err.message = Some("null_check_columns cannot contain empty names".into());
        return Err(err);
    }
    Ok(())
}
