// tollgate/src/commands/mod.rs

pub mod clean;
pub mod compile;
pub mod quality;
pub mod query;
pub mod run;
pub mod validate;

use anyhow::Context;
use std::path::{Path, PathBuf};

use tollgate_core::application::register_sources;
use tollgate_core::domain::ExecutionContext;
use tollgate_core::infrastructure::adapters::DuckDBConnector;
use tollgate_core::infrastructure::config::{ProjectConfig, load_project_config};

/// A loaded project: its config, execution context and an open connection
/// with every source registered.
pub struct Project {
    pub dir: PathBuf,
    pub config: ProjectConfig,
    pub execution: ExecutionContext,
    pub connector: DuckDBConnector,
}

impl Project {
    pub async fn open(project_dir: &Path) -> anyhow::Result<Self> {
        let config = load_project_config(project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {:?}",
                project_dir
            )
        })?;
        println!("Project: {} (v{}) [{}]", config.name, config.version, config.profile);

        let db_path = config.database_path(project_dir);
        let connector = DuckDBConnector::new(&db_path)
            .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?;

        register_sources(&connector, project_dir, &config)
            .await
            .context("Failed to register sources")?;

        Ok(Self {
            dir: project_dir.to_path_buf(),
            execution: config.execution_context(),
            config,
            connector,
        })
    }

    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.execution = self.execution.with_verbose(v);
        }
        self
    }
}

/// Prints configuration errors with their miette help text.
pub fn print_error(err: tollgate_core::TollgateError) {
    use tollgate_core::TollgateError;
    use tollgate_core::domain::DomainError;

    match err {
        TollgateError::Domain(DomainError::Configuration(cfg)) => {
            eprintln!("{:?}", miette::Report::new(cfg));
        }
        other => eprintln!("Error: {}", other),
    }
}
