// tollgate/src/commands/quality.rs
//
// USE CASE: Quality checks against a single model.

use tollgate_core::application::{ReportLevel, Reporter, run_quality_checks};
use tollgate_core::domain::quality::QualityCheckConfig;
use tollgate_core::infrastructure::adapters::CatalogResolver;
use tollgate_core::ports::RelationResolver;

use super::{Project, print_error};
use crate::cli::QualityArgs;

pub async fn execute(args: QualityArgs) -> anyhow::Result<()> {
    let project = Project::open(&args.project_dir)
        .await?
        .with_verbose(args.verbose.resolve());

    let config = QualityCheckConfig {
        null_check_columns: args.null_checks,
        duplicate_check: args.duplicate_check,
        date_range_check: args.date_range_check,
        null_threshold_pct: args.null_threshold,
        min_rows: args.min_rows,
    };

    let resolver = CatalogResolver::new(&project.connector, project.execution.target_schema());
    let result = match resolver.resolve(&args.model).await {
        Ok(relation) => {
            run_quality_checks(&project.connector, &project.execution, &relation, &config).await
        }
        Err(e) => Err(e),
    };
    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };

    for line in Reporter::render(&summary, project.execution.is_verbose()) {
        match line.level {
            ReportLevel::Error => eprintln!("{}", line.message),
            ReportLevel::Info | ReportLevel::Warn => println!("{}", line.message),
        }
    }

    if summary.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
