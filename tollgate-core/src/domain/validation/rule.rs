// tollgate-core/src/domain/validation/rule.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::ConfigurationError;

/// Closed set of validation rules understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    NotNull,
    Unique,
    Positive,
    NonNegative,
    DateRange,
    EmailFormat,
    ReferentialIntegrity,
    AcceptedValues,
    CustomSql,
    ExpressionIsTrue,
    RowCount,
}

impl ValidationType {
    pub const ALL: [ValidationType; 11] = [
        ValidationType::NotNull,
        ValidationType::Unique,
        ValidationType::Positive,
        ValidationType::NonNegative,
        ValidationType::DateRange,
        ValidationType::EmailFormat,
        ValidationType::ReferentialIntegrity,
        ValidationType::AcceptedValues,
        ValidationType::CustomSql,
        ValidationType::ExpressionIsTrue,
        ValidationType::RowCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationType::NotNull => "not_null",
            ValidationType::Unique => "unique",
            ValidationType::Positive => "positive",
            ValidationType::NonNegative => "non_negative",
            ValidationType::DateRange => "date_range",
            ValidationType::EmailFormat => "email_format",
            ValidationType::ReferentialIntegrity => "referential_integrity",
            ValidationType::AcceptedValues => "accepted_values",
            ValidationType::CustomSql => "custom_sql",
            ValidationType::ExpressionIsTrue => "expression_is_true",
            ValidationType::RowCount => "row_count",
        }
    }

    /// Comma separated list of every tag, for error messages.
    pub fn valid_tags() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ConfigurationError::UnknownValidationType {
                tag: tag.to_string(),
                valid: Self::valid_tags(),
            })
    }
}

/// How a failing rule affects a suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    #[default]
    Error,
    Warn,
}

/// One validation as written by the user: a tag, an optional column and a
/// loose option map. Nothing is checked until the engine compiles it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RuleSpec {
    #[serde(rename = "type")]
    pub rule_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub severity: RuleSeverity,
}

impl RuleSpec {
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            column: None,
            config: BTreeMap::new(),
            severity: RuleSeverity::Error,
        }
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn with_severity(mut self, severity: RuleSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Short label used in logs: `not_null(order_id)`.
    pub fn label(&self) -> String {
        match &self.column {
            Some(col) => format!("{}({})", self.rule_type, col),
            None => self.rule_type.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        for tag in ValidationType::ALL {
            assert_eq!(tag.as_str().parse::<ValidationType>(), Ok(tag));
        }
        assert_eq!(
            " Not_Null ".parse::<ValidationType>(),
            Ok(ValidationType::NotNull)
        );
    }

    #[test]
    fn test_unknown_tag_lists_valid_set() {
        let err = "is_pretty".parse::<ValidationType>().unwrap_err();
        match err {
            ConfigurationError::UnknownValidationType { tag, valid } => {
                assert_eq!(tag, "is_pretty");
                assert!(valid.contains("referential_integrity"));
                assert!(valid.contains("row_count"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rule_spec_from_yaml() {
        let yaml = r#"
type: accepted_values
column: status
severity: warn
config:
  values: [placed, shipped]
"#;
        let rule: RuleSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.rule_type, "accepted_values");
        assert_eq!(rule.column.as_deref(), Some("status"));
        assert_eq!(rule.severity, RuleSeverity::Warn);
        assert!(rule.config.contains_key("values"));
        assert_eq!(rule.label(), "accepted_values(status)");
    }
}
