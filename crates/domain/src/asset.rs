//! Stored asset references and naming rules for the two storage tiers.

use serde::{Deserialize, Serialize};

const FALLBACK_FILE_NAME: &str = "upload";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Storage tier holding an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetLocation {
    /// Remote object store.
    Remote,
    /// Local upload directory.
    Local,
}

/// Reference to an asset persisted in one of the storage tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAsset {
    location: AssetLocation,
    reference: String,
}

impl StoredAsset {
    /// Creates a reference to a remote object by its public URL.
    #[must_use]
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            location: AssetLocation::Remote,
            reference: url.into(),
        }
    }

    /// Creates a reference to a locally served file.
    #[must_use]
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            location: AssetLocation::Local,
            reference: url.into(),
        }
    }

    /// Classifies a persisted reference: absolute HTTP(S) URLs are remote,
    /// everything else is served from local disk.
    #[must_use]
    pub fn from_reference(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::remote(reference)
        } else {
            Self::local(reference)
        }
    }

    /// Returns the tier holding the asset.
    #[must_use]
    pub fn location(&self) -> AssetLocation {
        self.location
    }

    /// Returns the URL clients use to fetch the asset.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.reference.as_str()
    }

    /// Consumes the asset and returns its reference.
    #[must_use]
    pub fn into_reference(self) -> String {
        self.reference
    }
}

/// Builds the local file name for an upload as `<size>-<sanitized name>`.
///
/// Only the last path segment of `original_name` is kept and characters
/// outside `[A-Za-z0-9._-]` are replaced with `_`.
#[must_use]
pub fn local_file_name(size: u64, original_name: &str) -> String {
    let base_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let sanitized = base_name
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || matches!(character, '.' | '-' | '_') {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();

    let sanitized = match sanitized.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_owned(),
        _ => sanitized,
    };

    format!("{size}-{sanitized}")
}

/// Returns the file name addressed by a local reference.
///
/// Returns `None` when the last segment cannot name a file.
#[must_use]
pub fn file_name_from_reference(reference: &str) -> Option<&str> {
    let file_name = reference.rsplit('/').next()?;
    match file_name {
        "" | "." | ".." => None,
        _ if file_name.contains('\\') => None,
        _ => Some(file_name),
    }
}

/// Returns whether the file name carries a supported image extension.
#[must_use]
pub fn is_image_file_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
}

/// Public URL layout of the remote bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLayout {
    bucket: String,
    region: String,
    folder: String,
}

impl BucketLayout {
    /// Creates a layout for a bucket, its region and the key folder uploads go to.
    #[must_use]
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            folder: folder.into().trim_matches('/').to_owned(),
        }
    }

    /// Returns the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.bucket.as_str()
    }

    /// Returns the object key a file is uploaded under.
    #[must_use]
    pub fn object_key(&self, file_name: &str) -> String {
        if self.folder.is_empty() {
            file_name.to_owned()
        } else {
            format!("{}/{file_name}", self.folder)
        }
    }

    /// Returns the URL prefix shared by every object in the bucket.
    #[must_use]
    pub fn url_prefix(&self) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region)
    }

    /// Returns the public URL of an object key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}{key}", self.url_prefix())
    }

    /// Returns the object key for a URL inside this bucket.
    ///
    /// Returns `None` for URLs that do not belong to the bucket.
    #[must_use]
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        let prefix = self.url_prefix();
        url.strip_prefix(prefix.as_str())
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        AssetLocation, BucketLayout, StoredAsset, file_name_from_reference, is_image_file_name,
        local_file_name,
    };

    #[test]
    fn local_file_name_prefixes_size() {
        assert_eq!(local_file_name(10_240, "photo.jpg"), "10240-photo.jpg");
    }

    #[test]
    fn local_file_name_strips_directories_and_unsafe_characters() {
        assert_eq!(local_file_name(5, "../../etc/passwd"), "5-passwd");
        assert_eq!(local_file_name(5, "C:\\tmp\\my photo.png"), "5-my_photo.png");
        assert_eq!(local_file_name(5, ".."), "5-upload");
        assert_eq!(local_file_name(5, ""), "5-upload");
    }

    #[test]
    fn references_are_classified_by_scheme() {
        assert_eq!(
            StoredAsset::from_reference("https://bucket.s3.eu-west-1.amazonaws.com/a.png")
                .location(),
            AssetLocation::Remote
        );
        assert_eq!(
            StoredAsset::from_reference("/uploads/products/1-a.png").location(),
            AssetLocation::Local
        );
    }

    #[test]
    fn file_name_from_reference_rejects_directory_segments() {
        assert_eq!(
            file_name_from_reference("/uploads/products/1-a.png"),
            Some("1-a.png")
        );
        assert_eq!(file_name_from_reference("/uploads/products/"), None);
        assert_eq!(file_name_from_reference("/uploads/.."), None);
    }

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file_name("photo.JPG"));
        assert!(is_image_file_name("banner.gif"));
        assert!(!is_image_file_name("notes.txt"));
        assert!(!is_image_file_name("jpg"));
    }

    #[test]
    fn bucket_layout_maps_keys_and_urls() {
        let layout = BucketLayout::new("catalog", "ap-southeast-1", "/products/");
        let key = layout.object_key("1-a.png");
        assert_eq!(key, "products/1-a.png");

        let url = layout.public_url(key.as_str());
        assert_eq!(
            url,
            "https://catalog.s3.ap-southeast-1.amazonaws.com/products/1-a.png"
        );
        assert_eq!(layout.key_from_url(url.as_str()), Some(key));
        assert_eq!(
            layout.key_from_url("https://other.s3.ap-southeast-1.amazonaws.com/products/1-a.png"),
            None
        );
        assert_eq!(layout.key_from_url(layout.url_prefix().as_str()), None);
    }

    #[test]
    fn empty_folder_uses_bare_file_name() {
        let layout = BucketLayout::new("catalog", "us-east-1", "");
        assert_eq!(layout.object_key("1-a.png"), "1-a.png");
    }

    proptest! {
        #[test]
        fn local_file_name_never_contains_separators(size in any::<u64>(), name in ".*") {
            let file_name = local_file_name(size, &name);
            prop_assert!(!file_name.contains('/'));
            prop_assert!(!file_name.contains('\\'));
            let size_prefix = format!("{size}-");
            prop_assert!(file_name.starts_with(&size_prefix));
            prop_assert!(file_name_from_reference(&file_name).is_some());
        }
    }
}
