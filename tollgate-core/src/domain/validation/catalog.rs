// tollgate-core/src/domain/validation/catalog.rs

// Dispatch table: one entry per validation type. Adding a rule means adding
// an entry here and a variant to `CompiledRule`.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::error::ConfigurationError;
use crate::domain::sql::{check_expression, validate_identifier};
use crate::domain::validation::compiled::CompiledRule;
use crate::domain::validation::params::ParamReader;
use crate::domain::validation::rule::{RuleSpec, ValidationType};

/// Inputs handed to a compile function once the generic checks passed.
pub struct RuleInput<'a> {
    pub rule: &'static str,
    pub column: Option<&'a str>,
    pub params: ParamReader<'a>,
}

impl RuleInput<'_> {
    /// Column of a rule declared with `requires_column`.
    fn column(&self) -> Result<String, ConfigurationError> {
        self.column
            .map(str::to_string)
            .ok_or_else(|| ConfigurationError::MissingColumn {
                rule: self.rule.to_string(),
            })
    }

    fn expression(&self, key: &str) -> Result<String, ConfigurationError> {
        let expr = self.params.required_str(key)?;
        self.checked_expression(key, expr)
    }

    fn checked_expression(&self, key: &str, expr: String) -> Result<String, ConfigurationError> {
        check_expression(&expr).map_err(|reason| ConfigurationError::InvalidExpression {
            rule: self.rule.to_string(),
            key: key.to_string(),
            reason,
        })?;
        Ok(expr.trim().to_string())
    }
}

type CompileFn = fn(&RuleInput<'_>) -> Result<CompiledRule, ConfigurationError>;

pub struct RuleDefinition {
    pub validation_type: ValidationType,
    pub requires_column: bool,
    pub required: &'static [&'static str],
    /// Optional keys; defaults are applied by the compile function.
    pub optional: &'static [&'static str],
    compile: CompileFn,
}

pub static CATALOG: &[RuleDefinition] = &[
    RuleDefinition {
        validation_type: ValidationType::NotNull,
        requires_column: true,
        required: &[],
        optional: &[],
        compile: compile_not_null,
    },
    RuleDefinition {
        validation_type: ValidationType::Unique,
        requires_column: true,
        required: &[],
        optional: &["allow_nulls"],
        compile: compile_unique,
    },
    RuleDefinition {
        validation_type: ValidationType::Positive,
        requires_column: true,
        required: &[],
        optional: &["allow_nulls"],
        compile: compile_positive,
    },
    RuleDefinition {
        validation_type: ValidationType::NonNegative,
        requires_column: true,
        required: &[],
        optional: &["allow_nulls"],
        compile: compile_non_negative,
    },
    RuleDefinition {
        validation_type: ValidationType::DateRange,
        requires_column: true,
        required: &[],
        optional: &["min_date", "max_date", "allow_nulls"],
        compile: compile_date_range,
    },
    RuleDefinition {
        validation_type: ValidationType::EmailFormat,
        requires_column: true,
        required: &[],
        optional: &[],
        compile: compile_email_format,
    },
    RuleDefinition {
        validation_type: ValidationType::ReferentialIntegrity,
        requires_column: true,
        required: &["parent_model"],
        optional: &["parent_column"],
        compile: compile_referential_integrity,
    },
    RuleDefinition {
        validation_type: ValidationType::AcceptedValues,
        requires_column: true,
        required: &["values"],
        optional: &["allow_nulls"],
        compile: compile_accepted_values,
    },
    RuleDefinition {
        validation_type: ValidationType::CustomSql,
        requires_column: false,
        required: &["validation_sql"],
        optional: &["error_message"],
        compile: compile_custom_sql,
    },
    RuleDefinition {
        validation_type: ValidationType::ExpressionIsTrue,
        requires_column: false,
        required: &["expression"],
        optional: &["condition", "error_message"],
        compile: compile_expression_is_true,
    },
    RuleDefinition {
        validation_type: ValidationType::RowCount,
        requires_column: false,
        required: &[],
        optional: &["min_rows", "max_rows"],
        compile: compile_row_count,
    },
];

/// Entry for `validation_type`. The table covers every variant.
pub fn definition(validation_type: ValidationType) -> &'static RuleDefinition {
    CATALOG
        .iter()
        .find(|d| d.validation_type == validation_type)
        .unwrap_or_else(|| unreachable!("catalog is missing {}", validation_type))
}

impl RuleDefinition {
    /// Configured keys this rule neither requires nor accepts.
    fn ignored_keys(&self, params: &ParamReader<'_>) -> Vec<String> {
        let known: Vec<&str> = self.required.iter().chain(self.optional).copied().collect();
        params.unknown_keys(&known)
    }

    /// Generic checks (column, required keys, identifiers) then the
    /// rule-specific compile function.
    pub fn compile(&self, spec: &RuleSpec) -> Result<CompiledRule, ConfigurationError> {
        let rule = self.validation_type.as_str();
        let params = ParamReader::new(rule, &spec.config);

        let column = spec
            .column
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if self.requires_column && column.is_none() {
            return Err(ConfigurationError::MissingColumn {
                rule: rule.to_string(),
            });
        }
        if let Some(col) = column {
            validate_identifier(col)?;
        }

        for key in self.required {
            if !params.contains(key) {
                return Err(ConfigurationError::MissingParameter {
                    rule: rule.to_string(),
                    key: key.to_string(),
                });
            }
        }

        for key in self.ignored_keys(&params) {
            warn!(rule, key = %key, "Ignoring unknown validation parameter");
        }

        let input = RuleInput {
            rule,
            column,
            params,
        };
        (self.compile)(&input)
    }
}

// --- COMPILE FUNCTIONS ---

fn compile_not_null(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::NotNull {
        column: input.column()?,
    })
}

fn compile_unique(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::Unique {
        column: input.column()?,
        allow_nulls: input.params.bool_or("allow_nulls", false)?,
    })
}

fn compile_positive(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::Positive {
        column: input.column()?,
        allow_nulls: input.params.bool_or("allow_nulls", false)?,
    })
}

fn compile_non_negative(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::NonNegative {
        column: input.column()?,
        allow_nulls: input.params.bool_or("allow_nulls", false)?,
    })
}

fn compile_date_range(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    let min_date = input
        .params
        .optional_date("min_date")?
        .or_else(|| NaiveDate::from_ymd_opt(1900, 1, 1))
        .unwrap_or_default();
    let max_date = input.params.optional_date("max_date")?;

    if let Some(max) = max_date
        && max < min_date
    {
        return Err(ConfigurationError::InvalidParameter {
            rule: input.rule.to_string(),
            key: "max_date".into(),
            reason: format!("{} is before min_date {}", max, min_date),
        });
    }

    Ok(CompiledRule::DateRange {
        column: input.column()?,
        min_date,
        max_date,
        allow_nulls: input.params.bool_or("allow_nulls", false)?,
    })
}

fn compile_email_format(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::EmailFormat {
        column: input.column()?,
    })
}

fn compile_referential_integrity(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    let column = input.column()?;
    let parent_model = input.params.required_str("parent_model")?.trim().to_string();
    for part in parent_model.split('.') {
        validate_identifier(part)?;
    }

    let parent_column = match input.params.optional_str("parent_column")? {
        Some(pc) => {
            let pc = pc.trim().to_string();
            validate_identifier(&pc)?;
            pc
        }
        None => column.clone(),
    };

    Ok(CompiledRule::ReferentialIntegrity {
        column,
        parent_model,
        parent_column,
    })
}

fn compile_accepted_values(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    Ok(CompiledRule::AcceptedValues {
        column: input.column()?,
        values: input.params.required_list("values")?,
        allow_nulls: input.params.bool_or("allow_nulls", false)?,
    })
}

fn compile_custom_sql(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    let validation_sql = input.expression("validation_sql")?;
    let error_message = input
        .params
        .optional_str("error_message")?
        .unwrap_or_else(|| "Custom validation failed".to_string());

    Ok(CompiledRule::CustomSql {
        validation_sql,
        error_message,
    })
}

fn compile_expression_is_true(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    let expression = input.expression("expression")?;
    let condition = match input.params.optional_str("condition")? {
        Some(cond) => input.checked_expression("condition", cond)?,
        None => "true".to_string(),
    };
    let error_message = input
        .params
        .optional_str("error_message")?
        .unwrap_or_else(|| format!("Expression is not true: {}", expression));

    Ok(CompiledRule::ExpressionIsTrue {
        expression,
        condition,
        error_message,
    })
}

fn compile_row_count(input: &RuleInput<'_>) -> Result<CompiledRule, ConfigurationError> {
    let min_rows = input.params.optional_u64("min_rows")?.unwrap_or(1);
    let max_rows = input.params.optional_u64("max_rows")?;

    if let Some(max) = max_rows
        && max < min_rows
    {
        return Err(ConfigurationError::InvalidParameter {
            rule: input.rule.to_string(),
            key: "max_rows".into(),
            reason: format!("{} is below min_rows {}", max, min_rows),
        });
    }

    Ok(CompiledRule::RowCount { min_rows, max_rows })
}
