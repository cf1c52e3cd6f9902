use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catalog_core::AppResult;

/// File received from a client, fully buffered.
#[derive(Clone, PartialEq, Eq)]
pub struct AssetUpload {
    /// File name as sent by the client.
    pub original_name: String,
    /// Content type as sent by the client.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    /// Returns the upload size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for AssetUpload {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AssetUpload")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Result of removing a local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalRemoval {
    /// The file existed and was removed.
    Removed,
    /// No file existed under that name.
    AlreadyAbsent,
}

/// Port over the local upload directory.
#[async_trait]
pub trait LocalAssetStore: Send + Sync {
    /// Writes a file, creating the directory when needed, and returns its path.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf>;

    /// Removes a file by name.
    async fn remove(&self, file_name: &str) -> AppResult<LocalRemoval>;
}

/// Port over the remote object store.
#[async_trait]
pub trait RemoteObjectStore: Send + Sync {
    /// Uploads the file at `source` under `key`.
    async fn put_object(&self, key: &str, source: &Path, content_type: Option<&str>)
    -> AppResult<()>;

    /// Deletes the object stored under `key`.
    async fn delete_object(&self, key: &str) -> AppResult<()>;
}
