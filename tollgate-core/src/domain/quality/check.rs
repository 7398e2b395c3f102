// tollgate-core/src/domain/quality/check.rs

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    RowCount,
    NullRatio,
    Duplicates,
    DateRange,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckKind::RowCount => "row_count",
            CheckKind::NullRatio => "null_ratio",
            CheckKind::Duplicates => "duplicates",
            CheckKind::DateRange => "date_range",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// A message a check contributes to the run summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Finding {
    Warning(String),
    Error(String),
}

/// Outcome of one executed check. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub status: CheckStatus,
    /// Count or percentage, depending on the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
    /// Narration line, e.g. `email: 0 nulls (0.00%)`.
    pub detail: String,
    pub findings: Vec<Finding>,
}

impl CheckResult {
    pub fn new(kind: CheckKind, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            kind,
            column: None,
            status,
            magnitude: None,
            detail: detail.into(),
            findings: Vec::new(),
        }
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = Some(magnitude);
        self
    }

    pub fn warning(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::Warning(message.into()));
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.findings.push(Finding::Error(message.into()));
        self
    }

    /// Counted in `passed`. A pass may still carry warnings.
    pub fn is_passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Warning(m) => Some(m.as_str()),
            Finding::Error(_) => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Error(m) => Some(m.as_str()),
            Finding::Warning(_) => None,
        })
    }
}
