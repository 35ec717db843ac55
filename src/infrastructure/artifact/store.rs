//! Filesystem artifact store. The directory is the index and the filename is
//! the key; nothing is tracked in memory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::artifact::validate_filename;
use crate::domain::DomainError;

/// Outcome of [`ArtifactStore::ensure_dir`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if needed. Concurrent callers may race;
    /// losing the race counts as `AlreadyPresent`. Every other failure,
    /// including a non-directory at the path, is returned.
    pub async fn ensure_dir(&self) -> Result<DirStatus, DomainError> {
        match tokio::fs::create_dir(&self.root).await {
            Ok(()) => {
                debug!(root = %self.root.display(), "Created artifact directory");
                Ok(DirStatus::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if tokio::fs::metadata(&self.root).await.is_ok_and(|m| m.is_dir()) {
                    Ok(DirStatus::AlreadyPresent)
                } else {
                    Err(self.storage_error("exists and is not a directory"))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tokio::fs::create_dir_all(&self.root)
                    .await
                    .map_err(|e| self.storage_error(e))?;
                Ok(DirStatus::Created)
            }
            Err(e) => Err(self.storage_error(e)),
        }
    }

    /// Path an artifact with this filename is written to
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, DomainError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    /// Hidden sibling path a new version of `filename` is rendered into. It
    /// keeps the artifact's extension so renderers pick the same format.
    pub fn staging_path_for(&self, filename: &str) -> Result<PathBuf, DomainError> {
        validate_filename(filename)?;
        Ok(self
            .root
            .join(format!(".{}.{}", Uuid::new_v4().simple(), filename)))
    }

    /// Move a fully written staging file over the artifact. Readers see
    /// either the previous file or the new one, never a partial write.
    pub async fn publish(&self, staging: &Path, path: &Path) -> Result<(), DomainError> {
        tokio::fs::rename(staging, path)
            .await
            .map_err(|e| DomainError::storage(format!("{}: {}", path.display(), e)))
    }

    /// Remove a staging file left by a failed render
    pub async fn discard(&self, staging: &Path) {
        match tokio::fs::remove_file(staging).await {
            Ok(()) => debug!(path = %staging.display(), "Removed staging file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %staging.display(), error = %e, "Failed to remove staging file"),
        }
    }

    /// Path of an artifact that is already on disk
    pub async fn existing(&self, filename: &str) -> Result<PathBuf, DomainError> {
        let path = self.path_for(filename)?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(artifact_not_found(filename)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(artifact_not_found(filename)),
            Err(e) => Err(DomainError::storage(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn storage_error(&self, e: impl std::fmt::Display) -> DomainError {
        DomainError::storage(format!("{}: {}", self.root.display(), e))
    }
}

fn artifact_not_found(filename: &str) -> DomainError {
    DomainError::not_found(format!("Artifact '{}' not found", filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_dir_created_then_present() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("instance").join("erd"));

        assert_eq!(store.ensure_dir().await.unwrap(), DirStatus::Created);
        assert_eq!(store.ensure_dir().await.unwrap(), DirStatus::AlreadyPresent);
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_ensure_dir_rejects_file_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("erd");
        std::fs::write(&root, b"not a directory").unwrap();

        let err = ArtifactStore::new(&root).ensure_dir().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_ensure_dir_concurrent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("erd"));

        let (a, b) = tokio::join!(store.ensure_dir(), store.ensure_dir());
        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_existing_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.existing("pedsnet_v2_dmsa_0.4.png").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_existing_present_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("omop_v5_dmsa_0.4.svg"), b"<svg/>").unwrap();
        let store = ArtifactStore::new(dir.path());

        let path = store.existing("omop_v5_dmsa_0.4.svg").await.unwrap();
        assert_eq!(path, dir.path().join("omop_v5_dmsa_0.4.svg"));
    }

    #[tokio::test]
    async fn test_staging_file_is_hidden_until_published() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let staging = store.staging_path_for("omop_v5_dmsa_0.4.svg").unwrap();
        let path = store.path_for("omop_v5_dmsa_0.4.svg").unwrap();

        assert_eq!(staging.parent(), Some(dir.path()));
        assert_eq!(staging.extension().unwrap(), "svg");

        std::fs::write(&staging, b"<svg/>").unwrap();
        let staging_name = staging.file_name().unwrap().to_str().unwrap();
        assert!(store.existing(staging_name).await.is_err());
        assert!(store.existing("omop_v5_dmsa_0.4.svg").await.is_err());

        store.publish(&staging, &path).await.unwrap();
        assert_eq!(store.existing("omop_v5_dmsa_0.4.svg").await.unwrap(), path);
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_discard_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let staging = store.staging_path_for("omop_v5_dmsa_0.4.png").unwrap();

        store.discard(&staging).await;
        std::fs::write(&staging, b"partial").unwrap();
        store.discard(&staging).await;

        assert!(!staging.exists());
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = ArtifactStore::new("/tmp/erd");
        assert!(matches!(
            store.path_for("../etc/passwd"),
            Err(DomainError::Validation { .. })
        ));
    }
}
