// tollgate-core/src/error.rs

use crate::domain::error::{ConfigurationError, DomainError};
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TollgateError {
    // --- DOMAIN ERRORS (rule configuration, relations, quality config) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (database, IO, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl TollgateError {
    /// True when the error was raised before any query ran because a rule
    /// was misconfigured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TollgateError::Domain(DomainError::Configuration(_)))
    }
}

impl From<ConfigurationError> for TollgateError {
    fn from(err: ConfigurationError) -> Self {
        TollgateError::Domain(DomainError::Configuration(err))
    }
}

impl From<std::io::Error> for TollgateError {
    fn from(err: std::io::Error) -> Self {
        TollgateError::Infrastructure(InfrastructureError::Io(err))
    }
}
