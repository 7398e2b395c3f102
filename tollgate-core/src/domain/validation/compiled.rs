// tollgate-core/src/domain/validation/compiled.rs

// Typed rules and their SQL. Every query returns the violating rows plus a
// `validation_error` message column; an empty result is a pass.

use chrono::NaiveDate;

use crate::domain::relation::Relation;
use crate::domain::sql::{quote_ident, quote_literal};
use crate::domain::validation::params::Literal;
use crate::domain::validation::query::{ERROR_COLUMN, QuerySpec};
use crate::domain::validation::rule::ValidationType;

/// Where a compiled rule runs.
#[derive(Debug, Clone, Copy)]
pub struct QueryTarget<'a> {
    pub relation: &'a Relation,
    /// Resolved `parent_model` for referential integrity.
    pub parent: Option<&'a Relation>,
    /// Reference date for `date_range` when `max_date` is absent.
    pub today: NaiveDate,
}

impl<'a> QueryTarget<'a> {
    pub fn new(relation: &'a Relation, today: NaiveDate) -> Self {
        Self {
            relation,
            parent: None,
            today,
        }
    }

    pub fn with_parent(mut self, parent: &'a Relation) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A rule whose parameters have been checked and typed.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledRule {
    NotNull {
        column: String,
    },
    Unique {
        column: String,
        allow_nulls: bool,
    },
    Positive {
        column: String,
        allow_nulls: bool,
    },
    NonNegative {
        column: String,
        allow_nulls: bool,
    },
    DateRange {
        column: String,
        min_date: NaiveDate,
        max_date: Option<NaiveDate>,
        allow_nulls: bool,
    },
    EmailFormat {
        column: String,
    },
    ReferentialIntegrity {
        column: String,
        parent_model: String,
        parent_column: String,
    },
    AcceptedValues {
        column: String,
        values: Vec<Literal>,
        allow_nulls: bool,
    },
    CustomSql {
        validation_sql: String,
        error_message: String,
    },
    ExpressionIsTrue {
        expression: String,
        condition: String,
        error_message: String,
    },
    RowCount {
        min_rows: u64,
        max_rows: Option<u64>,
    },
}

fn null_clause(column: &str, allow_nulls: bool) -> String {
    if allow_nulls {
        String::new()
    } else {
        format!(" OR {} IS NULL", column)
    }
}

/// `CASE` yielding `<col> is null` for NULL values and `fallback` otherwise.
fn null_or(column: &str, raw_column: &str, fallback: String) -> String {
    format!(
        "CASE WHEN {c} IS NULL THEN {null_msg} ELSE {fallback} END",
        c = column,
        null_msg = quote_literal(&format!("{} is null", raw_column)),
        fallback = fallback,
    )
}

/// `'<prefix>' || CAST(<expr> AS VARCHAR) || '<suffix>'`
fn describe(prefix: &str, expr: &str, suffix: &str) -> String {
    let mut out = format!("{} || CAST({} AS VARCHAR)", quote_literal(prefix), expr);
    if !suffix.is_empty() {
        out.push_str(" || ");
        out.push_str(&quote_literal(suffix));
    }
    out
}

/// Quotes each part of a dotted name: `staging.orders` -> `"staging"."orders"`.
fn quote_dotted(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

impl CompiledRule {
    pub fn validation_type(&self) -> ValidationType {
        match self {
            CompiledRule::NotNull { .. } => ValidationType::NotNull,
            CompiledRule::Unique { .. } => ValidationType::Unique,
            CompiledRule::Positive { .. } => ValidationType::Positive,
            CompiledRule::NonNegative { .. } => ValidationType::NonNegative,
            CompiledRule::DateRange { .. } => ValidationType::DateRange,
            CompiledRule::EmailFormat { .. } => ValidationType::EmailFormat,
            CompiledRule::ReferentialIntegrity { .. } => ValidationType::ReferentialIntegrity,
            CompiledRule::AcceptedValues { .. } => ValidationType::AcceptedValues,
            CompiledRule::CustomSql { .. } => ValidationType::CustomSql,
            CompiledRule::ExpressionIsTrue { .. } => ValidationType::ExpressionIsTrue,
            CompiledRule::RowCount { .. } => ValidationType::RowCount,
        }
    }

    /// Model that must be resolved before the query can be built.
    pub fn parent_model(&self) -> Option<&str> {
        match self {
            CompiledRule::ReferentialIntegrity { parent_model, .. } => Some(parent_model),
            _ => None,
        }
    }

    pub fn build_query(&self, target: &QueryTarget<'_>) -> QuerySpec {
        let rel = target.relation.qualified();

        let sql = match self {
            CompiledRule::NotNull { column } => {
                let c = quote_ident(column);
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} WHERE {c} IS NULL",
                    msg = quote_literal(&format!("{} is null", column)),
                    err = ERROR_COLUMN,
                )
            }

            CompiledRule::Unique {
                column,
                allow_nulls,
            } => {
                let c = quote_ident(column);
                let filter = if *allow_nulls {
                    String::new()
                } else {
                    format!(" WHERE {} IS NOT NULL", c)
                };
                format!(
                    "SELECT {c} AS failing_value, COUNT(*) AS duplicate_count, {msg} AS {err} \
                     FROM {rel}{filter} GROUP BY {c} HAVING COUNT(*) > 1",
                    msg = describe(
                        &format!("Duplicate value in {} (", column),
                        "COUNT(*)",
                        " rows)"
                    ),
                    err = ERROR_COLUMN,
                )
            }

            CompiledRule::Positive {
                column,
                allow_nulls,
            } => {
                let c = quote_ident(column);
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} WHERE {c} <= 0{nulls}",
                    msg = null_or(
                        &c,
                        column,
                        describe(&format!("{} must be positive, got ", column), &c, "")
                    ),
                    err = ERROR_COLUMN,
                    nulls = null_clause(&c, *allow_nulls),
                )
            }

            CompiledRule::NonNegative {
                column,
                allow_nulls,
            } => {
                let c = quote_ident(column);
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} WHERE {c} < 0{nulls}",
                    msg = null_or(
                        &c,
                        column,
                        describe(&format!("{} must be non-negative, got ", column), &c, "")
                    ),
                    err = ERROR_COLUMN,
                    nulls = null_clause(&c, *allow_nulls),
                )
            }

            CompiledRule::DateRange {
                column,
                min_date,
                max_date,
                allow_nulls,
            } => {
                let c = quote_ident(column);
                let min = min_date.format("%Y-%m-%d").to_string();
                let max = max_date
                    .unwrap_or(target.today)
                    .format("%Y-%m-%d")
                    .to_string();
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} \
                     WHERE (CAST({c} AS DATE) < DATE '{min}' OR CAST({c} AS DATE) > DATE '{max}'){nulls}",
                    msg = null_or(
                        &c,
                        column,
                        describe(
                            &format!("{} ", column),
                            &c,
                            &format!(" outside [{}, {}]", min, max)
                        )
                    ),
                    err = ERROR_COLUMN,
                    nulls = null_clause(&c, *allow_nulls),
                )
            }

            CompiledRule::EmailFormat { column } => {
                let c = quote_ident(column);
                // exactly one '@', a '.' somewhere after it, no spaces
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} \
                     WHERE {c} IS NOT NULL AND NOT regexp_full_match(CAST({c} AS VARCHAR), '^[^@ ]*@[^@ ]*[.][^@ ]*$')",
                    msg = describe("Invalid email format: ", &c, ""),
                    err = ERROR_COLUMN,
                )
            }

            CompiledRule::ReferentialIntegrity {
                column,
                parent_model,
                parent_column,
            } => {
                let c = quote_ident(column);
                let pc = quote_ident(parent_column);
                let parent_rel = target
                    .parent
                    .map(Relation::qualified)
                    .unwrap_or_else(|| quote_dotted(parent_model));
                format!(
                    "SELECT child.{c} AS failing_value, {msg} AS {err} \
                     FROM {rel} AS child LEFT JOIN {parent_rel} AS parent ON child.{c} = parent.{pc} \
                     WHERE child.{c} IS NOT NULL AND parent.{pc} IS NULL",
                    msg = describe(
                        &format!("{} value ", column),
                        &format!("child.{}", c),
                        &format!(" not found in {}.{}", parent_model, parent_column)
                    ),
                    err = ERROR_COLUMN,
                )
            }

            CompiledRule::AcceptedValues {
                column,
                values,
                allow_nulls,
            } => {
                let c = quote_ident(column);
                let list = values
                    .iter()
                    .map(Literal::to_sql)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "SELECT *, {msg} AS {err} FROM {rel} WHERE ({c} NOT IN ({list}){nulls})",
                    msg = null_or(
                        &c,
                        column,
                        describe("Unexpected value ", &c, &format!(" in {}", column))
                    ),
                    err = ERROR_COLUMN,
                    nulls = null_clause(&c, *allow_nulls),
                )
            }

            CompiledRule::CustomSql {
                validation_sql,
                error_message,
            } => format!(
                "SELECT *, {msg} AS {err} FROM {rel} WHERE NOT ({validation_sql})",
                msg = quote_literal(error_message),
                err = ERROR_COLUMN,
            ),

            CompiledRule::ExpressionIsTrue {
                expression,
                condition,
                error_message,
            } => format!(
                "SELECT *, {msg} AS {err} FROM {rel} WHERE ({condition}) AND NOT ({expression})",
                msg = quote_literal(error_message),
                err = ERROR_COLUMN,
            ),

            CompiledRule::RowCount { min_rows, max_rows } => {
                let below = describe(
                    "Row count ",
                    "row_count",
                    &format!(" is below minimum {}", min_rows),
                );
                let (filter, msg) = match max_rows {
                    Some(max) => (
                        format!("row_count < {} OR row_count > {}", min_rows, max),
                        format!(
                            "CASE WHEN row_count < {} THEN {} ELSE {} END",
                            min_rows,
                            below,
                            describe(
                                "Row count ",
                                "row_count",
                                &format!(" exceeds maximum {}", max)
                            )
                        ),
                    ),
                    None => (format!("row_count < {}", min_rows), below),
                };
                format!(
                    "SELECT row_count, {msg} AS {err} \
                     FROM (SELECT COUNT(*) AS row_count FROM {rel}) AS counts WHERE {filter}",
                    err = ERROR_COLUMN,
                )
            }
        };

        QuerySpec::new(self.validation_type(), target.relation.identifier(), sql)
    }
}
