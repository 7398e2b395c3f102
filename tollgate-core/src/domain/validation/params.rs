// tollgate-core/src/domain/validation/params.rs

// Typed access to a rule's loose option map. Every accessor reports the
// rule and key on failure so the user can fix the YAML directly.

use chrono::NaiveDate;
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::domain::error::ConfigurationError;
use crate::domain::sql::quote_literal;

/// A constant accepted by `accepted_values`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Literal {
    pub fn to_sql(&self) -> String {
        match self {
            Literal::Text(s) => quote_literal(s),
            Literal::Integer(v) => v.to_string(),
            Literal::Float(v) => v.to_string(),
            Literal::Boolean(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        }
    }
}

pub struct ParamReader<'a> {
    rule: &'a str,
    config: &'a BTreeMap<String, Value>,
}

impl<'a> ParamReader<'a> {
    pub fn new(rule: &'a str, config: &'a BTreeMap<String, Value>) -> Self {
        Self { rule, config }
    }

    /// Explicit `null` counts as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.config.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::InvalidParameter {
            rule: self.rule.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn missing(&self, key: &str) -> ConfigurationError {
        ConfigurationError::MissingParameter {
            rule: self.rule.to_string(),
            key: key.to_string(),
        }
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<String>, ConfigurationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<String, ConfigurationError> {
        match self.optional_str(key)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            Some(_) => Err(self.invalid(key, "must not be empty")),
            None => Err(self.missing(key)),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigurationError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" => Ok(true),
                "false" | "no" => Ok(false),
                _ => Err(self.invalid(key, "expected a boolean")),
            },
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ConfigurationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "expected a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| self.invalid(key, "expected a non-negative integer")),
            Some(_) => Err(self.invalid(key, "expected a non-negative integer")),
        }
    }

    /// Dates are written `YYYY-MM-DD`.
    pub fn optional_date(&self, key: &str) -> Result<Option<NaiveDate>, ConfigurationError> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(|e| self.invalid(key, format!("'{}' is not a YYYY-MM-DD date ({})", s, e))),
        }
    }

    pub fn required_list(&self, key: &str) -> Result<Vec<Literal>, ConfigurationError> {
        let seq = match self.get(key) {
            None => return Err(self.missing(key)),
            Some(Value::Sequence(seq)) => seq,
            Some(_) => return Err(self.invalid(key, "expected a list")),
        };

        if seq.is_empty() {
            return Err(self.invalid(key, "list must not be empty"));
        }

        seq.iter()
            .map(|item| match item {
                Value::String(s) => Ok(Literal::Text(s.clone())),
                Value::Bool(b) => Ok(Literal::Boolean(*b)),
                Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                    (Some(i), _) => Ok(Literal::Integer(i)),
                    (None, Some(f)) if !f.is_finite() => {
                        Err(self.invalid(key, format!("non-finite number {}", f)))
                    }
                    (None, Some(f)) => Ok(Literal::Float(f)),
                    _ => Err(self.invalid(key, format!("unsupported number {}", n))),
                },
                other => Err(self.invalid(key, format!("unsupported list item {:?}", other))),
            })
            .collect()
    }

    /// Keys present in the map that the rule does not know about.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<String> {
        self.config
            .keys()
            .filter(|k| !known.contains(&k.as_str()))
            .cloned()
            .collect()
    }
}
