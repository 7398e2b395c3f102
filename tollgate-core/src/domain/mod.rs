pub mod context;
pub mod error;
pub mod macros;
pub mod quality;
pub mod relation;
pub mod sql;
pub mod tabular;
pub mod validation;

// Re-exports to keep imports short elsewhere
pub use context::ExecutionContext;
pub use error::{ConfigurationError, DomainError};
pub use relation::{ColumnSchema, Relation};
pub use tabular::{ScalarValue, TabularColumn, TabularResult};
