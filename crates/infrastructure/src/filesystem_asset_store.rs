use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catalog_application::{LocalAssetStore, LocalRemoval};
use catalog_core::{AppError, AppResult};

/// Local-disk asset store rooted at the upload directory.
#[derive(Debug, Clone)]
pub struct FilesystemAssetStore {
    root: PathBuf,
}

impl FilesystemAssetStore {
    /// Creates a store writing files directly under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the upload directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn path_for(&self, file_name: &str) -> AppResult<PathBuf> {
        let is_plain_name = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        if !is_plain_name {
            return Err(AppError::Validation(format!(
                "invalid local asset file name '{file_name}'"
            )));
        }

        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl LocalAssetStore for FilesystemAssetStore {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let path = self.path_for(file_name)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to create upload directory '{}': {error}",
                self.root.display()
            ))
        })?;

        tokio::fs::write(&path, bytes).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write local asset '{}': {error}",
                path.display()
            ))
        })?;

        Ok(path)
    }

    async fn remove(&self, file_name: &str) -> AppResult<LocalRemoval> {
        let path = self.path_for(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(LocalRemoval::Removed),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(LocalRemoval::AlreadyAbsent),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove local asset '{}': {error}",
                path.display()
            ))),
        }
    }
}
