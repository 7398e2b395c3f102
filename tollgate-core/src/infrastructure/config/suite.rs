// tollgate-core/src/infrastructure/config/suite.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::domain::quality::QualityCheckConfig;
use crate::domain::validation::RuleSpec;
use crate::infrastructure::config::project::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

/// Validations and quality checks declared for one model.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelSuite {
    pub name: String,
    #[serde(default)]
    pub validations: Vec<RuleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_checks: Option<QualityCheckConfig>,
    #[serde(skip)]
    pub defined_in: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SuiteFile {
    #[serde(default)]
    pub models: Vec<ModelSuite>,
}

fn is_suite_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yml" || ext == "yaml")
}

pub fn load_suite_file(path: &Path) -> Result<SuiteFile, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(SuiteFile::default());
    }
    let mut file: SuiteFile =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::YamlError {
            path: path.display().to_string(),
            source,
        })?;
    for model in &mut file.models {
        model.defined_in = path.to_path_buf();
    }
    Ok(file)
}

/// Every model suite under the configured `config-paths`, in file-name order.
pub fn discover_suites(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<ModelSuite>, InfrastructureError> {
    let mut suites = Vec::new();

    for folder in &config.config_paths {
        let dir = project_dir.join(folder);
        if !dir.exists() {
            warn!(path = ?dir, "Validation folder does not exist, skipping");
            continue;
        }

        let walker = WalkDir::new(&dir).follow_links(true).sort_by_file_name();
        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_suite_file(path) {
                continue;
            }
            let file = load_suite_file(path)?;
            debug!(path = ?path, models = file.models.len(), "Loaded validation suite");
            suites.extend(file.models);
        }
    }

    info!(models = suites.len(), "Validation suites discovered");
    Ok(suites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_discovers_nested_suites_in_order() -> Result<()> {
        let dir = tempdir()?;
        let validations = dir.path().join("validations");
        fs::create_dir_all(validations.join("marts"))?;

        fs::write(
            validations.join("b_orders.yml"),
            "models:\n  - name: orders\n    validations:\n      - type: not_null\n        column: order_id\n",
        )?;
        fs::write(
            validations.join("marts").join("customers.yaml"),
            "models:\n  - name: customers\n    quality_checks:\n      null_check_columns: [email]\n",
        )?;
        fs::write(validations.join("notes.md"), "ignored")?;
        fs::write(validations.join("empty.yml"), "")?;

        let config: ProjectConfig = serde_yaml::from_str("name: shop")?;
        let suites = discover_suites(dir.path(), &config)?;

        let names: Vec<&str> = suites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "customers"]);
        assert_eq!(suites[0].validations[0].rule_type, "not_null");
        assert!(suites[1].quality_checks.is_some());
        assert!(suites[1].defined_in.ends_with("customers.yaml"));
        Ok(())
    }

    #[test]
    fn test_missing_folder_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let config: ProjectConfig = serde_yaml::from_str("name: shop")?;
        assert!(discover_suites(dir.path(), &config)?.is_empty());
        Ok(())
    }
}
