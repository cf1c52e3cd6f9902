//! Fakes shared by the service tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catalog_core::{AppError, AppResult};
use tokio::sync::Mutex;

use crate::{AssetUpload, LocalAssetStore, LocalRemoval, RemoteObjectStore};

pub(crate) const UPLOAD_DIR: &str = "/srv/uploads/products";

/// Storage operation observed by the fakes, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageOperation {
    LocalWrite(String),
    LocalRemove(String),
    RemotePut(String),
    RemoteDelete(String),
}

pub(crate) type OperationLog = std::sync::Arc<Mutex<Vec<StorageOperation>>>;

#[derive(Default)]
pub(crate) struct FakeLocalAssetStore {
    pub(crate) files: Mutex<BTreeMap<String, Vec<u8>>>,
    pub(crate) operations: OperationLog,
}

impl FakeLocalAssetStore {
    pub(crate) fn with_log(operations: OperationLog) -> Self {
        Self {
            files: Mutex::default(),
            operations,
        }
    }
}

#[async_trait]
impl LocalAssetStore for FakeLocalAssetStore {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        self.operations
            .lock()
            .await
            .push(StorageOperation::LocalWrite(file_name.to_owned()));
        self.files
            .lock()
            .await
            .insert(file_name.to_owned(), bytes.to_vec());
        Ok(Path::new(UPLOAD_DIR).join(file_name))
    }

    async fn remove(&self, file_name: &str) -> AppResult<LocalRemoval> {
        self.operations
            .lock()
            .await
            .push(StorageOperation::LocalRemove(file_name.to_owned()));
        Ok(match self.files.lock().await.remove(file_name) {
            Some(_) => LocalRemoval::Removed,
            None => LocalRemoval::AlreadyAbsent,
        })
    }
}

#[derive(Default)]
pub(crate) struct FakeRemoteObjectStore {
    pub(crate) objects: Mutex<BTreeMap<String, PathBuf>>,
    pub(crate) operations: OperationLog,
    pub(crate) fail_uploads: bool,
    pub(crate) fail_deletes: bool,
}

impl FakeRemoteObjectStore {
    pub(crate) fn with_log(operations: OperationLog) -> Self {
        Self {
            operations,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RemoteObjectStore for FakeRemoteObjectStore {
    async fn put_object(
        &self,
        key: &str,
        source: &Path,
        _content_type: Option<&str>,
    ) -> AppResult<()> {
        self.operations
            .lock()
            .await
            .push(StorageOperation::RemotePut(key.to_owned()));
        if self.fail_uploads {
            return Err(AppError::Unavailable("object store is down".to_owned()));
        }

        self.objects
            .lock()
            .await
            .insert(key.to_owned(), source.to_path_buf());
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.operations
            .lock()
            .await
            .push(StorageOperation::RemoteDelete(key.to_owned()));
        if self.fail_deletes {
            return Err(AppError::Unavailable("object store is down".to_owned()));
        }

        self.objects.lock().await.remove(key);
        Ok(())
    }
}

pub(crate) fn upload(name: &str, size: usize) -> AssetUpload {
    AssetUpload {
        original_name: name.to_owned(),
        content_type: Some("image/jpeg".to_owned()),
        bytes: vec![0xAB; size],
    }
}
