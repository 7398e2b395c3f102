// tollgate-core/src/domain/validation/engine.rs

use crate::domain::error::ConfigurationError;
use crate::domain::relation::Relation;
use crate::domain::validation::catalog::definition;
use crate::domain::validation::compiled::{CompiledRule, QueryTarget};
use crate::domain::validation::query::QuerySpec;
use crate::domain::validation::rule::{RuleSpec, ValidationType};

/// Turns user rules into executable queries.
///
/// Compilation is pure: every configuration problem surfaces as a
/// `ConfigurationError` before a relation is resolved or a query built.
/// Any row returned by the resulting query is a violation.
pub struct RuleEngine;

impl RuleEngine {
    pub fn compile(spec: &RuleSpec) -> Result<CompiledRule, ConfigurationError> {
        let validation_type: ValidationType = spec.rule_type.parse()?;
        definition(validation_type).compile(spec)
    }

    /// Single step build for rules that need no parent relation.
    /// `referential_integrity` goes through `compile` + `CompiledRule::build_query`
    /// so the caller can resolve the parent first.
    pub fn build_query(
        spec: &RuleSpec,
        relation: &Relation,
        today: chrono::NaiveDate,
    ) -> Result<QuerySpec, ConfigurationError> {
        let compiled = Self::compile(spec)?;
        Ok(compiled.build_query(&QueryTarget::new(relation, today)))
    }
}
