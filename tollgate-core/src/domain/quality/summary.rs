// tollgate-core/src/domain/quality/summary.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::domain::quality::check::{CheckResult, Finding};

/// In-progress summary, owned by a single aggregator run.
#[derive(Debug)]
pub struct QualityRun {
    relation: String,
    started_at: DateTime<Utc>,
    checks: Vec<CheckResult>,
}

impl QualityRun {
    pub fn start(relation: impl Into<String>) -> Self {
        Self::start_at(relation, Utc::now())
    }

    pub fn start_at(relation: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            relation: relation.into(),
            started_at,
            checks: Vec::new(),
        }
    }

    /// Adds a completed check. A check is recorded whole or not at all.
    pub fn record(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    pub fn recorded(&self) -> usize {
        self.checks.len()
    }

    pub fn finalize(self) -> QualityRunSummary {
        self.finalize_at(Utc::now())
    }

    pub fn finalize_at(self, finished_at: DateTime<Utc>) -> QualityRunSummary {
        let total_checks = self.checks.len();
        let passed_checks = self.checks.iter().filter(|c| c.is_passed()).count();

        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        for finding in self.checks.iter().flat_map(|c| &c.findings) {
            match finding {
                Finding::Warning(m) => warnings.push(m.clone()),
                Finding::Error(m) => errors.push(m.clone()),
            }
        }

        QualityRunSummary {
            relation: self.relation,
            total_checks,
            passed_checks,
            success_rate: success_rate(passed_checks, total_checks),
            warnings,
            errors,
            checks: self.checks,
            started_at: self.started_at,
            finished_at,
        }
    }
}

/// `passed / total * 100`, defined as 0 when nothing ran.
pub fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64 * 100.0
    }
}

/// Frozen result of one quality run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRunSummary {
    pub relation: String,
    pub total_checks: usize,
    pub passed_checks: usize,
    pub success_rate: f64,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub checks: Vec<CheckResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl QualityRunSummary {
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::policy;
    use chrono::TimeDelta;

    #[test]
    fn test_success_rate_is_zero_without_checks() {
        let summary = QualityRun::start("main.orders").finalize();
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_findings_fold_into_lists() {
        let start = Utc::now();
        let mut run = QualityRun::start_at("main.customers", start);
        run.record(policy::row_count(1000, None));
        run.record(policy::null_ratio("email", 40, 1000, 5.0));
        run.record(policy::null_ratio("phone", 60, 1000, 5.0));
        run.record(policy::duplicates("customer_id", 1));
        assert_eq!(run.recorded(), 4);

        let summary = run.finalize_at(start + TimeDelta::milliseconds(250));
        assert_eq!(summary.total_checks, 4);
        assert_eq!(summary.passed_checks, 2);
        assert_eq!(summary.success_rate, 50.0);
        assert_eq!(summary.warnings.len(), 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.duration(), Duration::from_millis(250));
    }
}
