// tollgate-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB error: {0}")]
    #[diagnostic(
        code(tollgate::infra::database::duckdb),
        help("The generated SQL was rejected by the engine. Run `tollgate compile` to inspect it.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DuckDB connection lock poisoned")]
    #[diagnostic(code(tollgate::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("File system error: {0}")]
    #[diagnostic(
        code(tollgate::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error in {path}: {source}")]
    #[diagnostic(
        code(tollgate::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    #[diagnostic(code(tollgate::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tollgate::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found: {0}")]
    #[diagnostic(
        code(tollgate::infra::config_missing),
        help("Create a tollgate.yaml at the project root or pass --project-dir.")
    )]
    ConfigNotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(
        code(tollgate::infra::template),
        help("Check the Jinja syntax ({{ ... }}) inside the rule parameters.")
    )]
    TemplateError(#[from] minijinja::Error),
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
