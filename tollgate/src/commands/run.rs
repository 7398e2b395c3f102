// tollgate/src/commands/run.rs
//
// USE CASE: Run every validation suite of the project.

use anyhow::Context;
use std::path::PathBuf;

use tollgate_core::application::{OutcomeStatus, SuiteRun, run_suite};
use tollgate_core::infrastructure::compiler::JinjaRenderer;
use tollgate_core::infrastructure::config::discover_suites;

use super::{Project, print_error};

pub async fn execute(
    project_dir: PathBuf,
    select: Option<String>,
    dry_run: bool,
    verbose: crate::cli::Verbosity,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let mut project = Project::open(&project_dir).await?.with_verbose(verbose.resolve());
    if dry_run {
        project.execution = project.execution.with_executing(false);
    }

    let suites = discover_suites(&project.dir, &project.config)
        .context("Failed to discover validation suites")?;
    let renderer = JinjaRenderer::new(project.execution.target_schema());

    let run = SuiteRun {
        connector: &project.connector,
        renderer: &renderer,
        execution: &project.execution,
        project_dir: &project.dir,
        config: &project.config,
    };

    let results = match run_suite(&run, &suites, select.as_deref()).await {
        Ok(results) => results,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    for model in &results.models {
        let failed = model
            .validations
            .iter()
            .filter(|v| v.status != OutcomeStatus::Pass && v.status != OutcomeStatus::Skipped)
            .count();
        println!(
            "{:<24} {} validations, {} failing{}",
            model.model,
            model.validations.len(),
            failed,
            model
                .quality
                .as_ref()
                .map(|q| format!(", quality {:.1}%", q.success_rate))
                .unwrap_or_default()
        );
    }

    if !results.executed {
        println!("\nDRY RUN. {} models compiled in {:.2?}", results.models.len(), start.elapsed());
    } else if results.success {
        println!("\nSUCCESS! {} models checked in {:.2?}", results.models.len(), start.elapsed());
    } else {
        let failed = results.failed_models();
        eprintln!("\nFAILURE. {} models failed: {}", failed.len(), failed.join(", "));
        std::process::exit(1);
    }

    Ok(())
}
