// tollgate/src/commands/compile.rs
//
// USE CASE: Print the SQL of every validation without executing it.

use anyhow::Context;
use std::path::PathBuf;

use tollgate_core::application::{ValidationContext, compile_validation};
use tollgate_core::infrastructure::adapters::CatalogResolver;
use tollgate_core::infrastructure::compiler::JinjaRenderer;
use tollgate_core::infrastructure::config::discover_suites;

use super::{Project, print_error};

pub async fn execute(project_dir: PathBuf, select: Option<String>) -> anyhow::Result<()> {
    let project = Project::open(&project_dir).await?;
    let suites = discover_suites(&project.dir, &project.config)
        .context("Failed to discover validation suites")?;

    let resolver = CatalogResolver::new(&project.connector, project.execution.target_schema());
    let renderer = JinjaRenderer::new(project.execution.target_schema());
    let ctx = ValidationContext {
        connector: &project.connector,
        resolver: &resolver,
        renderer: &renderer,
        execution: &project.execution,
    };

    let selected = suites
        .iter()
        .filter(|s| select.as_deref().is_none_or(|name| s.name == name));

    for suite in selected {
        for spec in &suite.validations {
            match compile_validation(&ctx, &suite.name, spec).await {
                Ok(query) => println!("-- {}: {}\n{};\n", suite.name, spec.label(), query.sql()),
                Err(e) => {
                    eprintln!("-- {}: {}", suite.name, spec.label());
                    print_error(e);
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
