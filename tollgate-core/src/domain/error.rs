// tollgate-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Raised before any query executes when a rule cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigurationError {
    #[error("unknown validation type '{tag}'")]
    #[diagnostic(
        code(tollgate::config::unknown_type),
        help("Valid validation types: {valid}")
    )]
    UnknownValidationType { tag: String, valid: String },

    #[error("validation '{rule}' requires a column")]
    #[diagnostic(code(tollgate::config::missing_column))]
    MissingColumn { rule: String },

    #[error("validation '{rule}' requires the '{key}' parameter")]
    #[diagnostic(code(tollgate::config::missing_parameter))]
    MissingParameter { rule: String, key: String },

    #[error("invalid '{key}' for validation '{rule}': {reason}")]
    #[diagnostic(code(tollgate::config::invalid_parameter))]
    InvalidParameter {
        rule: String,
        key: String,
        reason: String,
    },

    #[error("'{0}' is not a valid SQL identifier")]
    #[diagnostic(
        code(tollgate::config::identifier),
        help("Identifiers must match [A-Za-z_][A-Za-z0-9_]*")
    )]
    InvalidIdentifier(String),

    #[error("'{key}' for validation '{rule}' is not a SQL expression: {reason}")]
    #[diagnostic(code(tollgate::config::expression))]
    InvalidExpression {
        rule: String,
        key: String,
        reason: String,
    },
}

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Relation '{0}' not found")]
    #[diagnostic(
        code(tollgate::domain::relation_not_found),
        help("Check the model name and the target schema.")
    )]
    RelationNotFound(String),

    #[error("Invalid quality check configuration: {0}")]
    #[diagnostic(code(tollgate::domain::quality_config))]
    QualityConfig(String),
}
