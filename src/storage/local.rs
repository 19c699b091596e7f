//! Local filesystem storage implementation.
//!
//! Stores every object as a file directly under the root directory. Used for
//! development and single-host deployments; production deployments can use
//! `S3Engine` instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::StorageEngine;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    root_dir: PathBuf,
}

impl LocalEngine {
    /// Create a new LocalEngine rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Create a LocalEngine and make sure its root directory exists.
    pub async fn create(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let engine = Self::new(root_dir);
        tokio::fs::create_dir_all(&engine.root_dir).await?;
        Ok(engine)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageEngine for LocalEngine {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn location(&self, key: &str) -> String {
        self.path(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let engine = LocalEngine::new(tmp.path());

        engine.write("1.json", b"hello").await.unwrap();
        let data = engine.read("1.json").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!tmp.path().join("1.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let engine = LocalEngine::new(tmp.path());

        let data = engine.read("nope.json").await.unwrap();
        assert!(data.is_none());
        assert!(!engine.exists("nope.json").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_makes_root_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("state");

        let engine = LocalEngine::create(&root).await.unwrap();
        assert!(root.is_dir());

        engine.write("1.json", b"{}").await.unwrap();
        assert!(root.join("1.json").is_file());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let engine = LocalEngine::new(tmp.path());

        engine.write("2.json", b"{}").await.unwrap();
        assert!(engine.exists("2.json").await.unwrap());

        engine.delete("2.json").await.unwrap();
        engine.delete("2.json").await.unwrap();
        assert!(!engine.exists("2.json").await.unwrap());
    }
}
