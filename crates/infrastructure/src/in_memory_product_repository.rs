use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_application::{
    NewProduct, ProductListQuery, ProductPage, ProductRepository, SoftDeleteOutcome,
};
use catalog_core::{AppError, AppResult};
use catalog_domain::{Product, ProductId};
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ProductEntry {
    product: Product,
    deleted: bool,
}

#[derive(Debug, Default)]
struct ProductTable {
    next_id: i64,
    entries: BTreeMap<i64, ProductEntry>,
}

/// In-memory product repository used for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: RwLock<ProductTable>,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(product: &Product, search: Option<&str>) -> bool {
    let Some(search) = search else {
        return true;
    };

    let needle = search.to_lowercase();
    let fields = product.fields();
    fields.name.to_lowercase().contains(needle.as_str())
        || fields.description.to_lowercase().contains(needle.as_str())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_products(&self, query: ProductListQuery) -> AppResult<ProductPage> {
        let table = self.table.read().await;
        let mut products: Vec<Product> = table
            .entries
            .values()
            .filter(|entry| !entry.deleted)
            .map(|entry| &entry.product)
            .filter(|product| query.status.is_none_or(|status| product.status() == status))
            .filter(|product| matches_search(product, query.search.as_deref()))
            .cloned()
            .collect();

        products.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });

        let total = products.len() as u64;
        let products = products
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(ProductPage { products, total })
    }

    async fn find_product(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        Ok(self
            .table
            .read()
            .await
            .entries
            .get(&product_id.as_i64())
            .filter(|entry| !entry.deleted)
            .map(|entry| entry.product.clone()))
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = table.next_id;
        let now = Utc::now();

        let created = Product::hydrate(
            ProductId::new(id),
            product.fields,
            product.status,
            product.image_url,
            now,
            now,
        );
        table.entries.insert(
            id,
            ProductEntry {
                product: created.clone(),
                deleted: false,
            },
        );

        Ok(created)
    }

    async fn save_product(&self, product: &Product) -> AppResult<Product> {
        let mut table = self.table.write().await;
        match table.entries.get_mut(&product.id().as_i64()) {
            Some(entry) if !entry.deleted => {
                entry.product = product.clone();
                Ok(product.clone())
            }
            _ => Err(AppError::NotFound(format!(
                "product '{}' not found",
                product.id()
            ))),
        }
    }

    async fn soft_delete_product(&self, product_id: ProductId) -> AppResult<SoftDeleteOutcome> {
        let mut table = self.table.write().await;
        Ok(match table.entries.get_mut(&product_id.as_i64()) {
            None => SoftDeleteOutcome::NotFound,
            Some(entry) if entry.deleted => SoftDeleteOutcome::AlreadyDeleted,
            Some(entry) => {
                entry.deleted = true;
                SoftDeleteOutcome::Deleted
            }
        })
    }
}
