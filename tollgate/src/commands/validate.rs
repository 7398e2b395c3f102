// tollgate/src/commands/validate.rs
//
// USE CASE: Run one validation rule against one model.

use tollgate_core::application::{ValidationContext, compile_validation, run_validation};
use tollgate_core::domain::validation::{RuleSeverity, RuleSpec};
use tollgate_core::infrastructure::adapters::CatalogResolver;
use tollgate_core::infrastructure::compiler::JinjaRenderer;

use super::{Project, print_error};
use crate::cli::ValidateArgs;

const SAMPLE_SIZE: usize = 10;

pub async fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    let project = Project::open(&args.project_dir).await?;

    let mut spec = RuleSpec::new(&args.rule_type).with_severity(args.severity);
    if let Some(column) = &args.column {
        spec = spec.on_column(column);
    }
    for (key, value) in args.config {
        spec = spec.with(key, value);
    }

    let resolver = CatalogResolver::new(&project.connector, project.execution.target_schema());
    let renderer = JinjaRenderer::new(project.execution.target_schema());
    let ctx = ValidationContext {
        connector: &project.connector,
        resolver: &resolver,
        renderer: &renderer,
        execution: &project.execution,
    };

    if args.dry_run {
        match compile_validation(&ctx, &args.model, &spec).await {
            Ok(query) => {
                println!("{}", query.sql());
                return Ok(());
            }
            Err(e) => {
                print_error(e);
                std::process::exit(1);
            }
        }
    }

    let failures = match run_validation(&ctx, &args.model, &spec).await {
        Ok(failures) => failures,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    if failures.is_pass() {
        println!("PASS {} on {}", spec.label(), args.model);
        return Ok(());
    }

    println!("{} failing rows for {} on {}", failures.len(), spec.label(), args.model);
    for message in failures.sample_messages(SAMPLE_SIZE) {
        println!("  - {}", message);
    }
    if failures.len() > SAMPLE_SIZE {
        println!("  ... and {} more", failures.len() - SAMPLE_SIZE);
    }

    if spec.severity == RuleSeverity::Error {
        std::process::exit(1);
    }
    Ok(())
}
