// tollgate-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path` through a temp file in the same directory, so
/// readers never observe a half-written artifact. Creates missing parents.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("target").join("run_results.json");

        atomic_write(&file_path, "{}")?;

        assert_eq!(fs::read_to_string(file_path)?, "{}");
        Ok(())
    }

    #[test]
    fn test_atomic_write_replaces_previous_run() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("run_results.json");

        atomic_write(&file_path, r#"{"success":false}"#)?;
        atomic_write(&file_path, r#"{"success":true}"#)?;

        assert_eq!(fs::read_to_string(file_path)?, r#"{"success":true}"#);
        Ok(())
    }
}
