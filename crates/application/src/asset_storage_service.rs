//! Tiered asset storage.
//!
//! Every upload lands on local disk first. The remote object store is tried
//! next; when it fails the local copy is kept and served instead, so an
//! upload never fails because the remote tier is down.

use std::sync::Arc;

use catalog_core::{AppError, AppResult};
use catalog_domain::{
    AssetLocation, BucketLayout, StoredAsset, file_name_from_reference, local_file_name,
};
use tracing::{info, warn};

use crate::{AssetUpload, LocalAssetStore, LocalRemoval, RemoteObjectStore};

/// Application service storing and deleting product assets across tiers.
#[derive(Clone)]
pub struct AssetStorageService {
    local_store: Arc<dyn LocalAssetStore>,
    remote_store: Arc<dyn RemoteObjectStore>,
    bucket: BucketLayout,
    local_url_prefix: String,
}

impl AssetStorageService {
    /// Creates a storage service serving local files under `local_url_prefix`.
    #[must_use]
    pub fn new(
        local_store: Arc<dyn LocalAssetStore>,
        remote_store: Arc<dyn RemoteObjectStore>,
        bucket: BucketLayout,
        local_url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            local_store,
            remote_store,
            bucket,
            local_url_prefix: local_url_prefix.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Persists an upload and returns a reference to the tier that holds it.
    ///
    /// Only a failed local write is an error.
    pub async fn store(&self, upload: &AssetUpload) -> AppResult<StoredAsset> {
        let file_name = local_file_name(upload.size(), upload.original_name.as_str());
        let local_path = self
            .local_store
            .write(file_name.as_str(), upload.bytes.as_slice())
            .await?;

        let key = self.bucket.object_key(file_name.as_str());
        match self
            .remote_store
            .put_object(key.as_str(), local_path.as_path(), upload.content_type.as_deref())
            .await
        {
            Ok(()) => {
                if let Err(error) = self.local_store.remove(file_name.as_str()).await {
                    warn!(%file_name, %error, "failed to remove local copy after remote upload");
                }

                info!(%key, "asset stored in remote object store");
                Ok(StoredAsset::remote(self.bucket.public_url(key.as_str())))
            }
            Err(error) => {
                warn!(%key, %file_name, %error, "remote upload failed, keeping local copy");
                Ok(StoredAsset::local(format!(
                    "{}/{file_name}",
                    self.local_url_prefix
                )))
            }
        }
    }

    /// Deletes an asset from the tier it lives in.
    ///
    /// A local file that is already gone counts as deleted. Remote URLs outside
    /// the configured bucket are rejected without touching the store.
    pub async fn delete(&self, asset: &StoredAsset) -> AppResult<()> {
        match asset.location() {
            AssetLocation::Remote => {
                let key = self.bucket.key_from_url(asset.reference()).ok_or_else(|| {
                    AppError::NotFound(format!(
                        "asset '{}' is not stored in bucket '{}'",
                        asset.reference(),
                        self.bucket.bucket()
                    ))
                })?;

                self.remote_store.delete_object(key.as_str()).await?;
                info!(%key, "remote asset deleted");
                Ok(())
            }
            AssetLocation::Local => {
                let file_name = file_name_from_reference(asset.reference()).ok_or_else(|| {
                    AppError::NotFound(format!(
                        "asset '{}' does not name a local file",
                        asset.reference()
                    ))
                })?;

                match self.local_store.remove(file_name).await? {
                    LocalRemoval::Removed => info!(%file_name, "local asset deleted"),
                    LocalRemoval::AlreadyAbsent => {
                        info!(%file_name, "local asset already absent");
                    }
                }

                Ok(())
            }
        }
    }
}
