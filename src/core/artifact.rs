use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PipelineError;
use crate::models::GeneratedArtifact;

/// Single-slot store for the most recent generated program.
///
/// Every write truncates and replaces the file. There is no lock and no
/// atomic rename: concurrent jobs race on the slot and the last writer wins,
/// and a reader can observe a partially written file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
    executable: bool,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            executable: false,
        }
    }

    /// Mark written artifacts executable (unix only), for running them without an interpreter
    pub fn with_executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `source` to the slot, replacing whatever was there.
    ///
    /// The returned artifact path is absolute, resolved against the process's
    /// working directory, so it stays valid for a child started elsewhere.
    pub async fn write(&self, source: &str) -> Result<GeneratedArtifact, PipelineError> {
        let path = std::path::absolute(&self.path).map_err(|e| self.write_failure(e))?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.write_failure(e))?;
            }
        }

        tokio::fs::write(&path, source)
            .await
            .map_err(|e| self.write_failure(e))?;

        if self.executable {
            set_executable(&path).await.map_err(|e| self.write_failure(e))?;
        }

        debug!("Wrote {} bytes to {}", source.len(), path.display());
        Ok(GeneratedArtifact {
            source: source.to_string(),
            path,
        })
    }

    /// Current content of the slot, if any
    pub async fn read(&self) -> Option<String> {
        tokio::fs::read_to_string(&self.path).await.ok()
    }

    fn write_failure(&self, source: std::io::Error) -> PipelineError {
        PipelineError::WriteFailure {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    tokio::fs::set_permissions(path, perms).await
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("generated_script.py"));

        let artifact = store.write("print('hello')\n").await.unwrap();
        assert_eq!(artifact.source, "print('hello')\n");
        assert_eq!(artifact.path, store.path());
        assert_eq!(store.read().await.unwrap(), "print('hello')\n");
    }

    #[tokio::test]
    async fn test_write_replaces_previous_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("generated_script.py"));

        store.write("a much longer first program\nwith two lines\n").await.unwrap();
        store.write("short\n").await.unwrap();
        assert_eq!(store.read().await.unwrap(), "short\n");
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("nested/dir/solver.py"));

        store.write("print(1)\n").await.unwrap();
        assert_eq!(store.read().await.unwrap(), "print(1)\n");
    }

    #[tokio::test]
    async fn test_write_failure_when_path_is_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path());

        let err = store.write("print(1)\n").await.unwrap_err();
        assert!(matches!(err, PipelineError::WriteFailure { ref path, .. } if path == temp_dir.path()));
    }

    #[tokio::test]
    async fn test_relative_path_resolved_to_absolute() {
        let store = ArtifactStore::new(format!("solvehook_rel_{}.py", std::process::id()));

        let artifact = store.write("print(1)\n").await.unwrap();
        assert!(artifact.path.is_absolute());
        assert_eq!(artifact.path, std::env::current_dir().unwrap().join(store.path()));
        std::fs::remove_file(&artifact.path).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_executable_flag_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let plain = ArtifactStore::new(temp_dir.path().join("plain.sh"));
        let exec = ArtifactStore::new(temp_dir.path().join("exec.sh")).with_executable(true);

        let plain = plain.write("#!/bin/sh\n").await.unwrap();
        let exec = exec.write("#!/bin/sh\n").await.unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode();
        assert_eq!(mode(&plain.path) & 0o111, 0);
        assert_eq!(mode(&exec.path) & 0o111, 0o111);
    }

    #[tokio::test]
    async fn test_read_missing_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp_dir.path().join("missing.py"));
        assert!(store.read().await.is_none());
    }
}
