// tollgate-core/src/application/quality.rs

// Quality-check aggregator. One relation per run, checks strictly in order:
// row count, null ratios, duplicates, date range. An empty relation stops
// the run after the row count.

use tracing::{debug, info, instrument, warn};

use crate::application::engine::execute_query;
use crate::domain::context::ExecutionContext;
use crate::domain::quality::{DateSpan, QualityCheckConfig, QualityRun, QualityRunSummary, policy, queries};
use crate::domain::relation::Relation;
use crate::domain::sql::validate_identifier;
use crate::domain::tabular::TabularResult;
use crate::error::TollgateError;
use crate::ports::Connector;

fn count(result: &TabularResult, column: &str) -> Result<u64, TollgateError> {
    let value = result
        .column_by_name(column)
        .and_then(|c| c.values.first())
        .ok_or_else(|| TollgateError::InternalError(format!("query returned no '{}' value", column)))?;

    if value.is_null() {
        return Ok(0);
    }
    value
        .as_i64()
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| TollgateError::InternalError(format!("'{}' is not a count: {}", column, value)))
}

async fn count_query(connector: &dyn Connector, sql: &str, column: &str) -> Result<u64, TollgateError> {
    let result = execute_query(connector, sql).await?;
    count(&result, column)
}

/// Rejects bad thresholds and column names before the first query.
pub(crate) fn preflight(config: &QualityCheckConfig) -> Result<(), TollgateError> {
    config.check()?;
    let columns = config
        .null_check_columns
        .iter()
        .chain(&config.duplicate_check)
        .chain(&config.date_range_check);
    for column in columns {
        validate_identifier(column.trim())?;
    }
    Ok(())
}

#[instrument(skip(connector, execution, config), fields(relation = %relation.identifier()))]
pub async fn run_quality_checks(
    connector: &dyn Connector,
    execution: &ExecutionContext,
    relation: &Relation,
    config: &QualityCheckConfig,
) -> Result<QualityRunSummary, TollgateError> {
    preflight(config)?;
    let mut run = QualityRun::start(relation.identifier());

    if !execution.is_executing() {
        info!("Dry run, quality checks not executed");
        return Ok(run.finalize());
    }

    // 1. Row count, unconditionally
    let rows = count_query(connector, &queries::row_count(relation), "row_count").await?;
    run.record(policy::row_count(rows, config.min_rows));
    if rows == 0 {
        warn!("{}, skipping remaining checks", policy::EMPTY_TABLE);
        return Ok(run.finalize());
    }

    // 2. Null ratio per column
    for column in &config.null_check_columns {
        let column = column.trim();
        let nulls = count_query(connector, &queries::null_count(relation, column)?, "null_count").await?;
        let check = policy::null_ratio(column, nulls, rows, config.null_threshold_pct);
        debug!(column, nulls, status = ?check.status, "Null check");
        run.record(check);
    }

    // 3. Duplicates
    if let Some(column) = config.duplicate_check.as_deref().map(str::trim) {
        let groups = count_query(
            connector,
            &queries::duplicate_groups(relation, column)?,
            "duplicate_groups",
        )
        .await?;
        run.record(policy::duplicates(column, groups));
    }

    // 4. Date range and future dates, recorded together
    if let Some(column) = config.date_range_check.as_deref().map(str::trim) {
        let span_result = execute_query(connector, &queries::date_span(relation, column)?).await?;
        let span = DateSpan {
            min: first_text(&span_result, "min_date"),
            max: first_text(&span_result, "max_date"),
            span_days: span_result
                .column_by_name("span_days")
                .and_then(|c| c.values.first())
                .and_then(|v| v.as_i64()),
        };
        let future = count_query(
            connector,
            &queries::future_count(relation, column, execution.today())?,
            "future_count",
        )
        .await?;
        run.record(policy::date_range(column, &span, future));
    }

    let summary = run.finalize();
    info!(
        total = summary.total_checks,
        passed = summary.passed_checks,
        warnings = summary.warnings.len(),
        errors = summary.errors.len(),
        "Quality checks finished"
    );
    Ok(summary)
}

fn first_text(result: &TabularResult, column: &str) -> Option<String> {
    result
        .column_by_name(column)
        .and_then(|c| c.values.first())
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::mock::MockConnector;
    use crate::domain::error::DomainError;
    use crate::domain::quality::CheckStatus;
    use crate::domain::tabular::ScalarValue;

    fn customers() -> Relation {
        Relation::new("main", "customers", vec![])
    }

    fn scalar(name: &str, v: i64) -> TabularResult {
        TabularResult::scalar(name, ScalarValue::Integer(v))
    }

    #[tokio::test]
    async fn test_empty_relation_short_circuits() {
        let db = MockConnector::new().with_response("row_count", scalar("row_count", 0));
        let config = QualityCheckConfig::default()
            .with_null_checks(["email"])
            .with_duplicate_check("customer_id")
            .with_date_range_check("signup_date");

        let summary = run_quality_checks(&db, &ExecutionContext::default(), &customers(), &config)
            .await
            .unwrap();

        assert_eq!(summary.total_checks, 1);
        assert_eq!(summary.passed_checks, 0);
        assert_eq!(summary.errors, vec!["Empty table - 0 rows".to_string()]);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(db.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_full_sequence() {
        let db = MockConnector::new()
            .with_response("AS row_count", scalar("row_count", 1000))
            .with_response("COUNT(\"email\")", scalar("null_count", 40))
            .with_response("COUNT(\"phone\")", scalar("null_count", 60))
            .with_response("duplicate_groups", scalar("duplicate_groups", 0))
            .with_response(
                "min_date",
                TabularResult::from_rows(
                    vec!["min_date".into(), "max_date".into(), "span_days".into()],
                    vec![vec!["2024-01-01".into(), "2026-10-20".into(), ScalarValue::Integer(1023)]],
                ),
            )
            .with_response("future_count", scalar("future_count", 1));

        let config = QualityCheckConfig::default()
            .with_null_checks(["email", "phone"])
            .with_duplicate_check("customer_id")
            .with_date_range_check("signup_date");
        let execution = ExecutionContext::default()
            .with_today(chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let summary = run_quality_checks(&db, &execution, &customers(), &config)
            .await
            .unwrap();

        assert_eq!(summary.total_checks, 5);
        assert_eq!(summary.passed_checks, 4);
        assert_eq!(summary.success_rate, 80.0);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].starts_with("Column phone has 6.00% null values"));
        assert_eq!(
            summary.warnings,
            vec![
                "Column email has 4.00% null values (40 rows)".to_string(),
                "1 records with future dates".to_string(),
            ]
        );
        assert_eq!(summary.checks[4].status, CheckStatus::Pass);
        assert!(db.queries().last().unwrap().contains("> DATE '2026-10-19'"));
    }

    #[tokio::test]
    async fn test_row_count_below_minimum_keeps_going() {
        let db = MockConnector::new()
            .with_response("AS row_count", scalar("row_count", 3))
            .with_response("null_count", scalar("null_count", 0));
        let config = QualityCheckConfig::default()
            .with_min_rows(5)
            .with_null_checks(["email"]);

        let summary = run_quality_checks(&db, &ExecutionContext::default(), &customers(), &config)
            .await
            .unwrap();

        assert_eq!(summary.total_checks, 2);
        assert_eq!(summary.passed_checks, 1);
        assert_eq!(summary.errors, vec!["Row count 3 is below minimum 5".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicates_warn() {
        let db = MockConnector::new()
            .with_response("AS row_count", scalar("row_count", 10))
            .with_response("duplicate_groups", scalar("duplicate_groups", 2));
        let config = QualityCheckConfig::default().with_duplicate_check("customer_id");

        let summary = run_quality_checks(&db, &ExecutionContext::default(), &customers(), &config)
            .await
            .unwrap();

        assert!(summary.errors.is_empty());
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(summary.passed_checks, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_querying() {
        let db = MockConnector::new();
        let config = QualityCheckConfig {
            null_threshold_pct: -1.0,
            ..Default::default()
        };
        let err = run_quality_checks(&db, &ExecutionContext::default(), &customers(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, TollgateError::Domain(DomainError::QualityConfig(_))));

        let config = QualityCheckConfig::default().with_null_checks(["e mail"]);
        let err = run_quality_checks(&db, &ExecutionContext::default(), &customers(), &config)
            .await
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(db.queries().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_is_zero_check_summary() {
        let db = MockConnector::new();
        let execution = ExecutionContext::default().with_executing(false);
        let summary = run_quality_checks(&db, &execution, &customers(), &QualityCheckConfig::default())
            .await
            .unwrap();
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(db.queries().is_empty());
    }
}
