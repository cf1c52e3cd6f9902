use async_trait::async_trait;
use catalog_core::AppResult;
use catalog_domain::{Product, ProductFields, ProductId, ProductStatus};

/// Filtered page request against non-deleted products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListQuery {
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Restricts results to one status.
    pub status: Option<ProductStatus>,
    /// Maximum number of rows returned.
    pub limit: usize,
    /// Number of rows skipped.
    pub offset: usize,
}

/// One page of products and the filtered row count.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Products on this page, newest first.
    pub products: Vec<Product>,
    /// Number of products matching the filters across all pages.
    pub total: u64,
}

/// Product values to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Validated editable fields.
    pub fields: ProductFields,
    /// Initial status.
    pub status: ProductStatus,
    /// Reference of the attached image.
    pub image_url: Option<String>,
}

/// Outcome of a soft-delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeleteOutcome {
    /// The product was marked deleted.
    Deleted,
    /// The product had been marked deleted before.
    AlreadyDeleted,
    /// No product ever existed with that id.
    NotFound,
}

/// Repository port for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Lists non-deleted products matching the query.
    async fn list_products(&self, query: ProductListQuery) -> AppResult<ProductPage>;

    /// Finds a non-deleted product.
    async fn find_product(&self, product_id: ProductId) -> AppResult<Option<Product>>;

    /// Inserts a product and returns it with its assigned id and timestamps.
    async fn create_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Persists fields, status and image of a non-deleted product.
    ///
    /// Fails with `NotFound` when the product is missing or soft-deleted.
    async fn save_product(&self, product: &Product) -> AppResult<Product>;

    /// Marks a product as deleted.
    async fn soft_delete_product(&self, product_id: ProductId) -> AppResult<SoftDeleteOutcome>;
}
