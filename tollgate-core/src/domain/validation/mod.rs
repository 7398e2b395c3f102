// tollgate-core/src/domain/validation/mod.rs

pub mod catalog;
pub mod compiled;
pub mod engine;
pub mod params;
pub mod query;
pub mod rule;

pub use catalog::{CATALOG, RuleDefinition, definition};
pub use compiled::{CompiledRule, QueryTarget};
pub use engine::RuleEngine;
pub use params::Literal;
pub use query::{ERROR_COLUMN, FailureRow, FailureSet, QuerySpec};
pub use rule::{RuleSeverity, RuleSpec, ValidationType};
