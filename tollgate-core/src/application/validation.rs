// tollgate-core/src/application/validation.rs

// Single-rule entry point: render, compile, resolve, build, execute.

use serde_yaml::Value;
use tracing::{error, info, instrument, warn};

use crate::application::engine::execute_query;
use crate::application::ports::TemplateEngine;
use crate::domain::context::ExecutionContext;
use crate::domain::validation::{FailureSet, QuerySpec, QueryTarget, RuleEngine, RuleSeverity, RuleSpec};
use crate::error::TollgateError;
use crate::ports::{Connector, RelationResolver};

/// Parameters that may contain `{{ ... }}` and are rendered before compiling.
const TEMPLATED_PARAMS: [&str; 3] = ["validation_sql", "expression", "condition"];

/// Collaborators of a validation run.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub connector: &'a dyn Connector,
    pub resolver: &'a dyn RelationResolver,
    pub renderer: &'a dyn TemplateEngine,
    pub execution: &'a ExecutionContext,
}

pub(crate) fn render_params(
    spec: &RuleSpec,
    renderer: &dyn TemplateEngine,
    execution: &ExecutionContext,
) -> Result<RuleSpec, TollgateError> {
    let mut rendered = spec.clone();
    let vars = serde_json::json!({
        "target": { "schema": execution.target_schema(), "name": execution.environment() },
        "today": execution.today().format("%Y-%m-%d").to_string(),
    });

    for key in TEMPLATED_PARAMS {
        if let Some(Value::String(raw)) = rendered.config.get_mut(key)
            && (raw.contains("{{") || raw.contains("{%"))
        {
            *raw = renderer.render(raw, &vars)?;
        }
    }
    Ok(rendered)
}

/// Builds the query for `spec` against `model` without executing it.
/// Configuration errors surface before any relation is resolved.
pub async fn compile_validation(
    ctx: &ValidationContext<'_>,
    model: &str,
    spec: &RuleSpec,
) -> Result<QuerySpec, TollgateError> {
    let rendered = render_params(spec, ctx.renderer, ctx.execution)?;
    let compiled = RuleEngine::compile(&rendered)?;

    let relation = ctx.resolver.resolve(model).await?;
    if let Some(column) = rendered.column.as_deref()
        && !relation.has_column(column.trim())
    {
        warn!(
            relation = %relation.identifier(),
            column = column,
            "Column not found in relation, the query will likely fail"
        );
    }

    let parent = match compiled.parent_model() {
        Some(parent) => Some(ctx.resolver.resolve(parent).await?),
        None => None,
    };

    let mut target = QueryTarget::new(&relation, ctx.execution.today());
    if let Some(parent) = &parent {
        target = target.with_parent(parent);
    }
    Ok(compiled.build_query(&target))
}

/// Runs one rule. An empty `FailureSet` is a pass. Dry runs compile the
/// rule but return an empty set without querying.
#[instrument(skip(ctx, spec), fields(rule = %spec.label()))]
pub async fn run_validation(
    ctx: &ValidationContext<'_>,
    model: &str,
    spec: &RuleSpec,
) -> Result<FailureSet, TollgateError> {
    let query = compile_validation(ctx, model, spec).await?;

    if !ctx.execution.is_executing() {
        info!(model, "Dry run, validation not executed");
        return Ok(FailureSet::empty());
    }

    let result = execute_query(ctx.connector, query.sql()).await?;
    let failures = FailureSet::from_tabular(&result);

    if failures.is_pass() {
        info!(model, "PASS {}", spec.label());
    } else {
        let sample = failures.sample_messages(3).join("; ");
        match spec.severity {
            RuleSeverity::Error => error!(
                model,
                failures = failures.len(),
                "FAIL {}: {}",
                spec.label(),
                sample
            ),
            RuleSeverity::Warn => warn!(
                model,
                failures = failures.len(),
                "WARN {}: {}",
                spec.label(),
                sample
            ),
        }
    }
    Ok(failures)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::mock::MockConnector;
    use crate::domain::error::{ConfigurationError, DomainError};
    use crate::domain::tabular::{ScalarValue, TabularResult};
    use crate::infrastructure::adapters::CatalogResolver;
    use crate::infrastructure::compiler::JinjaRenderer;

    fn connector() -> MockConnector {
        MockConnector::new()
            .with_table("main", "orders", &["order_id", "customer_id", "status"])
            .with_table("main", "customers", &["customer_id"])
            .with_response(
                "LEFT JOIN",
                TabularResult::from_rows(vec!["failing_value".into(), "validation_error".into()], vec![]),
            )
            .with_response(
                "IS NULL",
                TabularResult::from_rows(
                    vec!["order_id".into(), "status".into(), "validation_error".into()],
                    vec![vec![ScalarValue::Integer(7), ScalarValue::Null, "status is null".into()]],
                ),
            )
    }

    #[tokio::test]
    async fn test_run_validation_returns_failing_rows() {
        let db = connector();
        let resolver = CatalogResolver::new(&db, "main");
        let renderer = JinjaRenderer::default();
        let execution = ExecutionContext::default();
        let ctx = ValidationContext {
            connector: &db,
            resolver: &resolver,
            renderer: &renderer,
            execution: &execution,
        };

        let spec = RuleSpec::new("not_null").on_column("status");
        let failures = run_validation(&ctx, "orders", &spec).await.unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.value(0, "order_id"), Some(&ScalarValue::Integer(7)));
        assert_eq!(failures.rows()[0].message, "status is null");
    }

    #[tokio::test]
    async fn test_referential_integrity_resolves_parent() {
        let db = connector();
        let resolver = CatalogResolver::new(&db, "main");
        let renderer = JinjaRenderer::default();
        let execution = ExecutionContext::default();
        let ctx = ValidationContext {
            connector: &db,
            resolver: &resolver,
            renderer: &renderer,
            execution: &execution,
        };

        let spec = RuleSpec::new("referential_integrity")
            .on_column("customer_id")
            .with("parent_model", "customers");
        let failures = run_validation(&ctx, "orders", &spec).await.unwrap();
        assert!(failures.is_pass());
        assert!(db.queries()[0].contains("LEFT JOIN \"main\".\"customers\" AS parent"));

        let missing_parent = RuleSpec::new("referential_integrity")
            .on_column("customer_id")
            .with("parent_model", "accounts");
        let err = run_validation(&ctx, "orders", &missing_parent).await.unwrap_err();
        assert!(matches!(err, TollgateError::Domain(DomainError::RelationNotFound(_))));
    }

    #[tokio::test]
    async fn test_configuration_error_before_any_query() {
        let db = connector();
        let resolver = CatalogResolver::new(&db, "main");
        let renderer = JinjaRenderer::default();
        let execution = ExecutionContext::default();
        let ctx = ValidationContext {
            connector: &db,
            resolver: &resolver,
            renderer: &renderer,
            execution: &execution,
        };

        // Unknown relation too: the configuration error must win.
        let spec = RuleSpec::new("accepted_values").on_column("status");
        let err = run_validation(&ctx, "nowhere", &spec).await.unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            TollgateError::Domain(DomainError::Configuration(ConfigurationError::MissingParameter { .. }))
        ));
        assert!(db.queries().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_skips_execution() {
        let db = connector();
        let resolver = CatalogResolver::new(&db, "main");
        let renderer = JinjaRenderer::default();
        let execution = ExecutionContext::default().with_executing(false);
        let ctx = ValidationContext {
            connector: &db,
            resolver: &resolver,
            renderer: &renderer,
            execution: &execution,
        };

        let spec = RuleSpec::new("not_null").on_column("status");
        assert!(run_validation(&ctx, "orders", &spec).await.unwrap().is_pass());
        assert!(db.queries().is_empty());
    }

    #[tokio::test]
    async fn test_expressions_are_rendered() {
        let db = connector();
        let resolver = CatalogResolver::new(&db, "main");
        let renderer = JinjaRenderer::default();
        let execution = ExecutionContext::default();
        let ctx = ValidationContext {
            connector: &db,
            resolver: &resolver,
            renderer: &renderer,
            execution: &execution,
        };

        let spec = RuleSpec::new("custom_sql").with(
            "validation_sql",
            "customer_id IN (SELECT customer_id FROM {{ ref('customers') }})",
        );
        let query = compile_validation(&ctx, "orders", &spec).await.unwrap();
        assert!(query.sql().contains("WHERE NOT (customer_id IN (SELECT customer_id FROM \"main\".\"customers\"))"));
    }
}
