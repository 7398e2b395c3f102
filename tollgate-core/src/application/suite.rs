// tollgate-core/src/application/suite.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use crate::application::ports::TemplateEngine;
use crate::application::quality::{self, run_quality_checks};
use crate::application::report::Reporter;
use crate::application::validation::{ValidationContext, render_params, run_validation};
use crate::domain::context::ExecutionContext;
use crate::domain::validation::{RuleEngine, RuleSeverity};
use crate::error::TollgateError;
use crate::infrastructure::adapters::CatalogResolver;
use crate::infrastructure::config::{ModelSuite, ProjectConfig};
use crate::infrastructure::fs::atomic_write;
use crate::ports::Connector;

pub const RUN_RESULTS_FILE: &str = "run_results.json";
const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Pass,
    Fail,
    /// The query could not run (missing column, engine error).
    Error,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub rule_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub severity: RuleSeverity,
    pub status: OutcomeStatus,
    pub failures: usize,
    pub sample_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// Failing error-severity rules and rules that could not run block the suite.
    pub fn is_blocking(&self) -> bool {
        match self.status {
            OutcomeStatus::Error => true,
            OutcomeStatus::Fail => self.severity == RuleSeverity::Error,
            OutcomeStatus::Pass | OutcomeStatus::Skipped => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelOutcome {
    pub model: String,
    pub validations: Vec<ValidationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<crate::domain::quality::QualityRunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_error: Option<String>,
}

impl ModelOutcome {
    pub fn is_blocking(&self) -> bool {
        self.validations.iter().any(ValidationOutcome::is_blocking)
            || self.quality_error.is_some()
            || self.quality.as_ref().is_some_and(|q| q.has_errors())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResults {
    pub project: String,
    pub environment: String,
    pub executed: bool,
    pub generated_at: DateTime<Utc>,
    pub success: bool,
    pub models: Vec<ModelOutcome>,
}

impl RunResults {
    pub fn failed_models(&self) -> Vec<&str> {
        self.models
            .iter()
            .filter(|m| m.is_blocking())
            .map(|m| m.model.as_str())
            .collect()
    }
}

/// Collaborators and settings of a suite run.
pub struct SuiteRun<'a> {
    pub connector: &'a dyn Connector,
    pub renderer: &'a dyn TemplateEngine,
    pub execution: &'a ExecutionContext,
    pub project_dir: &'a Path,
    pub config: &'a ProjectConfig,
}

/// Exposes every configured CSV source as a view.
pub async fn register_sources(
    connector: &dyn Connector,
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<(), TollgateError> {
    for (name, rel_path) in &config.sources {
        let path = project_dir.join(rel_path);
        if !path.exists() {
            warn!(source = %name, path = ?path, "Source file not found");
        }
        connector
            .register_source(name, &path.to_string_lossy())
            .await?;
        info!(source = %name, "Source registered");
    }
    Ok(())
}

/// Compiles every rule and checks every quality config before anything runs.
fn preflight(run: &SuiteRun<'_>, suites: &[&ModelSuite]) -> Result<(), TollgateError> {
    for suite in suites {
        for spec in &suite.validations {
            let rendered = render_params(spec, run.renderer, run.execution)?;
            if let Err(e) = RuleEngine::compile(&rendered) {
                error!(model = %suite.name, rule = %spec.label(), file = ?suite.defined_in, "Invalid validation: {}", e);
                return Err(e.into());
            }
        }
        if let Some(qc) = &suite.quality_checks {
            quality::preflight(qc)?;
        }
    }
    Ok(())
}

async fn run_model(ctx: &ValidationContext<'_>, suite: &ModelSuite) -> ModelOutcome {
    info!(model = %suite.name, rules = suite.validations.len(), "Validating model");
    let mut validations = Vec::with_capacity(suite.validations.len());

    for spec in &suite.validations {
        let base = ValidationOutcome {
            rule_type: spec.rule_type.clone(),
            column: spec.column.clone(),
            severity: spec.severity,
            status: OutcomeStatus::Pass,
            failures: 0,
            sample_messages: Vec::new(),
            error: None,
        };

        let outcome = match run_validation(ctx, &suite.name, spec).await {
            Ok(_) if !ctx.execution.is_executing() => ValidationOutcome {
                status: OutcomeStatus::Skipped,
                ..base
            },
            Ok(failures) if failures.is_pass() => base,
            Ok(failures) => ValidationOutcome {
                status: OutcomeStatus::Fail,
                failures: failures.len(),
                sample_messages: failures.sample_messages(SAMPLE_SIZE),
                ..base
            },
            Err(e) => {
                error!(model = %suite.name, rule = %spec.label(), "Validation could not run: {}", e);
                ValidationOutcome {
                    status: OutcomeStatus::Error,
                    error: Some(e.to_string()),
                    ..base
                }
            }
        };
        validations.push(outcome);
    }

    let (quality, quality_error) = match &suite.quality_checks {
        None => (None, None),
        Some(qc) => {
            let result = match ctx.resolver.resolve(&suite.name).await {
                Ok(relation) => run_quality_checks(ctx.connector, ctx.execution, &relation, qc).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(summary) => {
                    if ctx.execution.is_executing() {
                        Reporter::emit(&Reporter::render(&summary, ctx.execution.is_verbose()));
                    }
                    (Some(summary), None)
                }
                Err(e) => {
                    error!(model = %suite.name, "Quality checks could not run: {}", e);
                    (None, Some(e.to_string()))
                }
            }
        }
    };

    ModelOutcome {
        model: suite.name.clone(),
        validations,
        quality,
        quality_error,
    }
}

/// Runs every selected model suite and writes `run_results.json` under the
/// target path. Sources must already be registered on the connector.
#[instrument(skip_all, fields(project = %run.config.name, env = %run.execution.environment()))]
pub async fn run_suite(
    run: &SuiteRun<'_>,
    suites: &[ModelSuite],
    select: Option<&str>,
) -> Result<RunResults, TollgateError> {
    let selected: Vec<&ModelSuite> = suites
        .iter()
        .filter(|s| select.is_none_or(|name| s.name == name))
        .collect();
    if let Some(name) = select
        && selected.is_empty()
    {
        warn!(select = name, "No validation suite matches the selection");
    }

    preflight(run, &selected)?;

    let resolver = CatalogResolver::new(run.connector, run.execution.target_schema());
    let ctx = ValidationContext {
        connector: run.connector,
        resolver: &resolver,
        renderer: run.renderer,
        execution: run.execution,
    };

    let mut models = Vec::with_capacity(selected.len());
    for suite in selected {
        models.push(run_model(&ctx, suite).await);
    }

    let results = RunResults {
        project: run.config.name.clone(),
        environment: run.execution.environment().to_string(),
        executed: run.execution.is_executing(),
        generated_at: Utc::now(),
        success: !models.iter().any(ModelOutcome::is_blocking),
        models,
    };

    let path = write_run_results(&run.config.target_dir(run.project_dir), &results)?;
    info!(path = ?path, success = results.success, "Run results written");
    Ok(results)
}

pub fn write_run_results(target_dir: &Path, results: &RunResults) -> Result<PathBuf, TollgateError> {
    let path = target_dir.join(RUN_RESULTS_FILE);
    let json = serde_json::to_string_pretty(results)
        .map_err(crate::infrastructure::error::InfrastructureError::Json)?;
    atomic_write(&path, json)?;
    Ok(path)
}
