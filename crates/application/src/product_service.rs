use std::sync::Arc;

use catalog_core::{AppError, AppResult, FieldErrors, Principal};
use catalog_domain::{
    Permission, Product, ProductFields, ProductId, ProductInput, ProductStatus, StoredAsset,
    is_image_file_name,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    AssetStorageService, AssetUpload, NewProduct, ProductListQuery, ProductRepository,
    SoftDeleteOutcome,
};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListRequest {
    /// One-based page number.
    pub page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Optional search text.
    pub search: Option<String>,
    /// Optional status filter, honoured for callers allowed to see all products.
    pub status: Option<ProductStatus>,
}

impl ProductListRequest {
    /// Builds a request, clamping the page to 1 and falling back to the
    /// default page size for missing or non-positive values.
    #[must_use]
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        search: Option<String>,
        status: Option<ProductStatus>,
    ) -> Self {
        let page = page
            .and_then(|value| usize::try_from(value).ok())
            .filter(|value| *value >= 1)
            .unwrap_or(1);
        let per_page = per_page
            .and_then(|value| usize::try_from(value).ok())
            .filter(|value| *value >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let search = search
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Self {
            page,
            per_page,
            search,
            status,
        }
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of products with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    /// Products on the requested page.
    pub products: Vec<Product>,
    /// Filtered product count.
    pub total: u64,
    /// Requested page.
    pub current_page: usize,
    /// Rows per page.
    pub per_page: usize,
    /// Number of pages for the filtered count.
    pub total_pages: u64,
}

/// Application service for product listing and mutations.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    asset_storage: AssetStorageService,
}

impl ProductService {
    /// Creates a product service.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>, asset_storage: AssetStorageService) -> Self {
        Self {
            repository,
            asset_storage,
        }
    }

    /// Lists products visible to the principal.
    ///
    /// `view_all_products` sees every status and may filter by status;
    /// `view_active_products` only ever sees active products.
    pub async fn list_products(
        &self,
        principal: &Principal,
        request: ProductListRequest,
    ) -> AppResult<ProductListing> {
        let status = if principal.has_permission(Permission::ViewAllProducts.as_str()) {
            request.status
        } else if principal.has_permission(Permission::ViewActiveProducts.as_str()) {
            Some(ProductStatus::Active)
        } else {
            return Err(AppError::Forbidden("permission denied".to_owned()));
        };

        let page = self
            .repository
            .list_products(ProductListQuery {
                search: request.search.clone(),
                status,
                limit: request.per_page,
                offset: request.offset(),
            })
            .await?;

        Ok(ProductListing {
            products: page.products,
            total: page.total,
            current_page: request.page,
            per_page: request.per_page,
            total_pages: page.total.div_ceil(request.per_page as u64),
        })
    }

    /// Creates an active product, storing its image first when one is sent.
    pub async fn create_product(
        &self,
        input: ProductInput,
        upload: Option<AssetUpload>,
    ) -> AppResult<Product> {
        let fields = validate(&input, upload.as_ref())?;

        let image_url = match upload {
            Some(upload) => Some(self.asset_storage.store(&upload).await?.into_reference()),
            None => None,
        };

        let result = self
            .repository
            .create_product(NewProduct {
                fields,
                status: ProductStatus::Active,
                image_url: image_url.clone(),
            })
            .await;

        match result {
            Ok(product) => {
                info!(product_id = %product.id(), "product created");
                Ok(product)
            }
            Err(error) => {
                if let Some(image_url) = image_url {
                    self.discard_asset(image_url, "unsaved product").await;
                }
                Err(error)
            }
        }
    }

    /// Updates product fields and, when a new image is sent, replaces the image.
    ///
    /// The new image is stored and persisted before the previous one is
    /// removed.
    pub async fn update_product(
        &self,
        product_id: ProductId,
        input: ProductInput,
        upload: Option<AssetUpload>,
    ) -> AppResult<Product> {
        let fields = validate(&input, upload.as_ref())?;
        let mut product = self.load_product(product_id).await?;
        product.apply_fields(fields);

        let mut replaced_image_url = None;
        let mut new_image_url = None;
        if let Some(upload) = upload {
            let stored = self.asset_storage.store(&upload).await?.into_reference();
            let previous = product.replace_image_url(stored.clone());
            // Same size and name store under the reference the product
            // already holds; that file is both the old and the new image.
            if previous.as_deref() != Some(stored.as_str()) {
                replaced_image_url = previous;
                new_image_url = Some(stored);
            }
        }

        product.touch(Utc::now());
        let saved = match self.repository.save_product(&product).await {
            Ok(saved) => saved,
            Err(error) => {
                if let Some(new_image_url) = new_image_url {
                    self.discard_asset(new_image_url, "unsaved product").await;
                }
                return Err(error);
            }
        };

        if let Some(replaced_image_url) = replaced_image_url.filter(|url| !url.is_empty()) {
            self.discard_asset(replaced_image_url, "replaced product image").await;
        }

        info!(product_id = %saved.id(), "product updated");
        Ok(saved)
    }

    /// Flips a product between active and inactive.
    pub async fn toggle_product_status(&self, product_id: ProductId) -> AppResult<Product> {
        let mut product = self.load_product(product_id).await?;
        product.toggle_status();
        product.touch(Utc::now());

        let saved = self.repository.save_product(&product).await?;
        info!(product_id = %saved.id(), status = saved.status().as_i16(), "product status toggled");
        Ok(saved)
    }

    /// Soft-deletes a product.
    pub async fn delete_product(&self, product_id: ProductId) -> AppResult<()> {
        match self.repository.soft_delete_product(product_id).await? {
            SoftDeleteOutcome::Deleted => {
                info!(%product_id, "product deleted");
                Ok(())
            }
            SoftDeleteOutcome::AlreadyDeleted => Err(AppError::AlreadyDeleted(format!(
                "product '{product_id}' was already deleted"
            ))),
            SoftDeleteOutcome::NotFound => Err(not_found(product_id)),
        }
    }

    async fn load_product(&self, product_id: ProductId) -> AppResult<Product> {
        self.repository
            .find_product(product_id)
            .await?
            .ok_or_else(|| not_found(product_id))
    }

    async fn discard_asset(&self, reference: String, purpose: &str) {
        let asset = StoredAsset::from_reference(reference);
        if let Err(error) = self.asset_storage.delete(&asset).await {
            warn!(reference = asset.reference(), purpose, %error, "failed to delete asset");
        }
    }
}

fn not_found(product_id: ProductId) -> AppError {
    AppError::NotFound(format!("product '{product_id}' not found"))
}

fn validate(input: &ProductInput, upload: Option<&AssetUpload>) -> AppResult<ProductFields> {
    let image_is_valid = upload.is_none_or(|upload| is_image_file_name(&upload.original_name));
    let image_message = "The image must be a file of type: jpg, jpeg, png, gif.";

    match (input.validate(), image_is_valid) {
        (Ok(fields), true) => Ok(fields),
        (Ok(_), false) => {
            let mut errors = FieldErrors::new();
            errors.push("image", image_message);
            Err(AppError::InvalidFields(errors))
        }
        (Err(AppError::InvalidFields(mut errors)), false) => {
            errors.push("image", image_message);
            Err(AppError::InvalidFields(errors))
        }
        (Err(error), _) => Err(error),
    }
}
