use std::sync::Arc;

use catalog_application::AssetStorageService;
use catalog_domain::BucketLayout;
use catalog_infrastructure::{FilesystemAssetStore, S3ObjectStore};
use tracing::info;

use crate::api_config::ApiConfig;

const FALLBACK_AWS_REGION: &str = "us-east-1";

/// Builds tiered asset storage over the upload directory and S3.
pub(super) async fn build_asset_storage(config: &ApiConfig) -> AssetStorageService {
    let sdk_config = aws_config::load_from_env().await;
    let region = sdk_config
        .region()
        .map(ToString::to_string)
        .unwrap_or_else(|| FALLBACK_AWS_REGION.to_owned());
    info!(
        bucket = %config.aws_s3_bucket,
        %region,
        upload_dir = %config.upload_dir.display(),
        "asset storage configured"
    );

    let s3_client = aws_sdk_s3::Client::new(&sdk_config);
    AssetStorageService::new(
        Arc::new(FilesystemAssetStore::new(config.upload_dir.clone())),
        Arc::new(S3ObjectStore::new(s3_client, config.aws_s3_bucket.clone())),
        BucketLayout::new(
            config.aws_s3_bucket.as_str(),
            region.as_str(),
            config.aws_s3_folder.as_str(),
        ),
        config.upload_url_prefix.as_str(),
    )
}
