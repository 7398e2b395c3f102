// tollgate-core/src/domain/quality/queries.rs

use chrono::NaiveDate;

use crate::domain::error::ConfigurationError;
use crate::domain::relation::Relation;
use crate::domain::sql::{quote_ident, validate_identifier};

fn column(name: &str) -> Result<String, ConfigurationError> {
    validate_identifier(name)?;
    Ok(quote_ident(name))
}

pub fn row_count(rel: &Relation) -> String {
    format!("SELECT COUNT(*) AS row_count FROM {}", rel.qualified())
}

pub fn null_count(rel: &Relation, col: &str) -> Result<String, ConfigurationError> {
    Ok(format!(
        "SELECT COUNT(*) - COUNT({}) AS null_count FROM {}",
        column(col)?,
        rel.qualified()
    ))
}

/// Number of non-null values that occur more than once.
pub fn duplicate_groups(rel: &Relation, col: &str) -> Result<String, ConfigurationError> {
    let c = column(col)?;
    Ok(format!(
        "SELECT COUNT(*) AS duplicate_groups FROM \
         (SELECT {c} FROM {rel} WHERE {c} IS NOT NULL GROUP BY {c} HAVING COUNT(*) > 1) AS dups",
        rel = rel.qualified(),
    ))
}

pub fn date_span(rel: &Relation, col: &str) -> Result<String, ConfigurationError> {
    let c = column(col)?;
    Ok(format!(
        "SELECT CAST(MIN(CAST({c} AS DATE)) AS VARCHAR) AS min_date, \
         CAST(MAX(CAST({c} AS DATE)) AS VARCHAR) AS max_date, \
         date_diff('day', MIN(CAST({c} AS DATE)), MAX(CAST({c} AS DATE))) AS span_days \
         FROM {rel} WHERE {c} IS NOT NULL",
        rel = rel.qualified(),
    ))
}

pub fn future_count(rel: &Relation, col: &str, today: NaiveDate) -> Result<String, ConfigurationError> {
    Ok(format!(
        "SELECT COUNT(*) AS future_count FROM {} WHERE CAST({} AS DATE) > DATE '{}'",
        rel.qualified(),
        column(col)?,
        today.format("%Y-%m-%d")
    ))
}
