// tollgate-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info};

use crate::error::TollgateError;
use crate::infrastructure::config::load_project_config;

/// Relative, non-escaping paths only.
fn is_contained(rel: &Path) -> bool {
    rel.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Deletes every `clean-targets` entry. Returns the removed paths.
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, TollgateError> {
    info!("Cleaning project artifacts");
    let config = load_project_config(project_dir)?;

    let targets = if config.clean_targets.is_empty() {
        vec![config.target_path.clone()]
    } else {
        config.clean_targets
    };

    // Nothing is deleted unless every target is safe.
    if let Some(unsafe_target) = targets.iter().find(|t| !is_contained(Path::new(t))) {
        return Err(TollgateError::UnsafePath(unsafe_target.clone()));
    }

    let mut removed = Vec::new();
    for target in targets {
        let full_path = project_dir.join(&target);
        if !full_path.exists() {
            debug!(path = ?full_path, "Nothing to clean");
            continue;
        }
        if full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else {
            fs::remove_file(&full_path)?;
        }
        info!(target = %target, "Artifact removed");
        removed.push(target);
    }

    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_removes_configured_targets() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tollgate.yaml"),
            "name: shop\nclean-targets: [target, logs/run.log]\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("target/nested")).unwrap();
        fs::create_dir_all(dir.path().join("logs")).unwrap();
        fs::write(dir.path().join("logs/run.log"), "x").unwrap();

        let removed = clean_project(dir.path()).unwrap();
        assert_eq!(removed, vec!["target".to_string(), "logs/run.log".to_string()]);
        assert!(!dir.path().join("target").exists());
        assert!(dir.path().join("logs").exists());
    }

    #[test]
    fn test_rejects_escaping_targets() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tollgate.yaml"), "name: shop\nclean-targets: ['../outside']\n").unwrap();
        let err = clean_project(dir.path()).unwrap_err();
        assert!(matches!(err, TollgateError::UnsafePath(p) if p == "../outside"));
    }

    #[test]
    fn test_unsafe_target_keeps_safe_ones() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("tollgate.yaml"),
            "name: shop\nclean-targets: [target, '../outside']\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();

        let err = clean_project(dir.path()).unwrap_err();
        assert!(matches!(err, TollgateError::UnsafePath(p) if p == "../outside"));
        assert!(dir.path().join("target").exists());
    }
}
