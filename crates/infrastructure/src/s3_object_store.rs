//! Amazon S3 adapter for the remote object store port.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use catalog_application::RemoteObjectStore;
use catalog_core::{AppError, AppResult};

/// S3 implementation of the remote object store port.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Creates a store writing into `bucket`.
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl RemoteObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        source: &Path,
        content_type: Option<&str>,
    ) -> AppResult<()> {
        let body = ByteStream::from_path(source).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to open '{}' for upload: {error}",
                source.display()
            ))
        })?;

        self.client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(key)
            .body(body)
            .set_content_type(content_type.map(str::to_owned))
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!(
                    "failed to upload object '{key}': {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(self.bucket.as_str())
            .key(key)
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!(
                    "failed to delete object '{key}': {}",
                    DisplayErrorContext(&error)
                ))
            })?;

        Ok(())
    }
}
