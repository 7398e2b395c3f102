// tollgate-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::context::{DEFAULT_VERBOSE_ENVIRONMENTS, ExecutionContext};
use crate::infrastructure::error::InfrastructureError;

pub const PROJECT_FILES: [&str; 2] = ["tollgate.yaml", "tollgate_project.yaml"];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_verbose_environments")]
    pub verbose_environments: Vec<String>,
    /// Forces verbosity regardless of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose_environments: default_verbose_environments(),
            verbose: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[serde(rename = "config-paths", default = "default_config_paths")]
    pub config_paths: Vec<String>,

    /// View name -> CSV path, relative to the project root.
    #[serde(default)]
    pub sources: BTreeMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_version() -> String {
    "1.0.0".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_database() -> String {
    "tollgate.duckdb".to_string()
}
fn default_schema() -> String {
    "main".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_config_paths() -> Vec<String> {
    vec!["validations".to_string()]
}
fn default_verbose_environments() -> Vec<String> {
    DEFAULT_VERBOSE_ENVIRONMENTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ProjectConfig {
    /// Database path as the engine expects it: `:memory:` untouched,
    /// relative paths anchored at the project root.
    pub fn database_path(&self, project_dir: &Path) -> String {
        if self.database == ":memory:" || Path::new(&self.database).is_absolute() {
            self.database.clone()
        } else {
            project_dir.join(&self.database).to_string_lossy().into_owned()
        }
    }

    pub fn target_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.target_path)
    }

    pub fn execution_context(&self) -> ExecutionContext {
        let mut ctx = ExecutionContext::new(&self.profile)
            .with_verbose_environments(&self.logging.verbose_environments)
            .with_target_schema(&self.schema);
        if let Some(verbose) = self.logging.verbose {
            ctx = ctx.with_verbose(verbose);
        }
        ctx
    }
}

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
            path: config_path.display().to_string(),
            source,
        })?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in PROJECT_FILES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "no {} in {}",
        PROJECT_FILES.join(" or "),
        root.display()
    )))
}

/// `TOLLGATE_PROFILE`, `TOLLGATE_DATABASE` and `TOLLGATE_TARGET_PATH` win
/// over the file.
fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("TOLLGATE_PROFILE") {
        info!(old = %config.profile, new = %val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Some(val) = lookup("TOLLGATE_DATABASE") {
        info!(old = %config.database, new = %val, "Overriding database via ENV");
        config.database = val;
    }
    if let Some(val) = lookup("TOLLGATE_TARGET_PATH") {
        info!(old = %config.target_path, new = %val, "Overriding target path via ENV");
        config.target_path = val;
    }
}
