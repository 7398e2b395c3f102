// tollgate-core/src/domain/quality/policy.rs

// Threshold policy. Only an empty table, a row count under `min_rows` and a
// null ratio at or over the threshold are errors; duplicates and future
// dates are warnings.

use crate::domain::quality::check::{CheckKind, CheckResult, CheckStatus};

pub const EMPTY_TABLE: &str = "Empty table - 0 rows";

pub fn row_count(rows: u64, min_rows: Option<u64>) -> CheckResult {
    let detail = format!("Row count: {}", rows);

    let result = if rows == 0 {
        CheckResult::new(CheckKind::RowCount, CheckStatus::Fail, detail).error(EMPTY_TABLE)
    } else {
        match min_rows {
            Some(min) if rows < min => CheckResult::new(CheckKind::RowCount, CheckStatus::Fail, detail)
                .error(format!("Row count {} is below minimum {}", rows, min)),
            _ => CheckResult::new(CheckKind::RowCount, CheckStatus::Pass, detail),
        }
    };
    result.with_magnitude(rows as f64)
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 100.0) / total as f64
}

pub fn null_ratio(column: &str, nulls: u64, rows: u64, threshold_pct: f64) -> CheckResult {
    let pct = percentage(nulls, rows);
    let detail = format!("{}: {} nulls ({:.2}%)", column, nulls, pct);

    let result = if nulls == 0 {
        CheckResult::new(CheckKind::NullRatio, CheckStatus::Pass, detail)
    } else if pct < threshold_pct {
        CheckResult::new(CheckKind::NullRatio, CheckStatus::Pass, detail).warning(format!(
            "Column {} has {:.2}% null values ({} rows)",
            column, pct, nulls
        ))
    } else {
        CheckResult::new(CheckKind::NullRatio, CheckStatus::Fail, detail).error(format!(
            "Column {} has {:.2}% null values ({} rows), threshold {:.2}%",
            column, pct, nulls, threshold_pct
        ))
    };
    result.on_column(column).with_magnitude(pct)
}

pub fn duplicates(column: &str, duplicate_groups: u64) -> CheckResult {
    let result = if duplicate_groups == 0 {
        CheckResult::new(
            CheckKind::Duplicates,
            CheckStatus::Pass,
            format!("{}: no duplicates", column),
        )
    } else {
        CheckResult::new(
            CheckKind::Duplicates,
            CheckStatus::Warn,
            format!("{}: {} duplicate values", column, duplicate_groups),
        )
        .warning(format!(
            "Found {} duplicate values in column {}",
            duplicate_groups, column
        ))
    };
    result.on_column(column).with_magnitude(duplicate_groups as f64)
}

/// Range over the non-null values of a date column.
#[derive(Debug, Clone, PartialEq)]
pub struct DateSpan {
    pub min: Option<String>,
    pub max: Option<String>,
    pub span_days: Option<i64>,
}

/// Always a pass; only future-dated rows add a warning.
pub fn date_range(column: &str, span: &DateSpan, future_rows: u64) -> CheckResult {
    let detail = match (&span.min, &span.max) {
        (Some(min), Some(max)) => format!(
            "{}: {} to {} ({} days)",
            column,
            min,
            max,
            span.span_days.unwrap_or_default()
        ),
        _ => format!("{}: no non-null values", column),
    };

    let mut result = CheckResult::new(CheckKind::DateRange, CheckStatus::Pass, detail)
        .on_column(column)
        .with_magnitude(future_rows as f64);
    if future_rows > 0 {
        result = result.warning(format!("{} records with future dates", future_rows));
    }
    result
}
