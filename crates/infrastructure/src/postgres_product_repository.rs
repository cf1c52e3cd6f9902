use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use catalog_application::{
    NewProduct, ProductListQuery, ProductPage, ProductRepository, SoftDeleteOutcome,
};
use catalog_core::{AppError, AppResult};
use catalog_domain::{Product, ProductFields, ProductId, ProductStatus};

const PRODUCT_COLUMNS: &str = r#"
    id,
    name,
    description,
    price::DOUBLE PRECISION AS price,
    quantity,
    status,
    image,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed repository for catalog products.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
    status: i16,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = AppError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let status = ProductStatus::from_i16(row.status).map_err(|error| {
            AppError::Internal(format!("invalid status stored for product '{}': {error}", row.id))
        })?;

        Ok(Product::hydrate(
            ProductId::new(row.id),
            ProductFields {
                name: row.name,
                description: row.description,
                price: row.price,
                quantity: row.quantity,
            },
            status,
            Some(row.image).filter(|image| !image.is_empty()),
            row.created_at,
            row.updated_at,
        ))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_products(&self, query: ProductListQuery) -> AppResult<ProductPage> {
        let pattern = query.search.as_deref().map(like_pattern);
        let status = query.status.map(|status| status.as_i16());
        let limit = i64::try_from(query.limit)
            .map_err(|error| AppError::Validation(format!("invalid page size: {error}")))?;
        let offset = i64::try_from(query.offset)
            .map_err(|error| AppError::Validation(format!("invalid page offset: {error}")))?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE deleted_at IS NULL
                AND ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1)
                AND ($2::SMALLINT IS NULL OR status = $2)
            "#,
        )
        .bind(pattern.as_deref())
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count products: {error}")))?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE deleted_at IS NULL
                AND ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1)
                AND ($2::SMALLINT IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            OFFSET $4
            "#
        ))
        .bind(pattern.as_deref())
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list products: {error}")))?;

        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        let total = u64::try_from(total)
            .map_err(|error| AppError::Internal(format!("invalid product count: {error}")))?;

        Ok(ProductPage { products, total })
    }

    async fn find_product(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find product '{product_id}': {error}"))
        })?;

        row.map(Product::try_from).transpose()
    }

    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, description, price, quantity, status, image)
            VALUES ($1, $2, ROUND($3::NUMERIC, 2), $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.fields.name.as_str())
        .bind(product.fields.description.as_str())
        .bind(product.fields.price)
        .bind(product.fields.quantity)
        .bind(product.status.as_i16())
        .bind(product.image_url.as_deref().unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create product: {error}")))?;

        Product::try_from(row)
    }

    async fn save_product(&self, product: &Product) -> AppResult<Product> {
        let fields = product.fields();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = ROUND($4::NUMERIC, 2),
                quantity = $5,
                status = $6,
                image = $7,
                updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.id().as_i64())
        .bind(fields.name.as_str())
        .bind(fields.description.as_str())
        .bind(fields.price)
        .bind(fields.quantity)
        .bind(product.status().as_i16())
        .bind(product.image_url().unwrap_or_default())
        .bind(product.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save product '{}': {error}", product.id()))
        })?;

        row.map(Product::try_from)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("product '{}' not found", product.id())))
    }

    async fn soft_delete_product(&self, product_id: ProductId) -> AppResult<SoftDeleteOutcome> {
        let deleted = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE products
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete product '{product_id}': {error}"))
        })?;

        if deleted.is_some() {
            return Ok(SoftDeleteOutcome::Deleted);
        }

        let already_deleted = sqlx::query_scalar::<_, bool>(
            "SELECT deleted_at IS NOT NULL FROM products WHERE id = $1",
        )
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to inspect product '{product_id}': {error}"))
        })?;

        Ok(match already_deleted {
            Some(true) => SoftDeleteOutcome::AlreadyDeleted,
            Some(false) | None => SoftDeleteOutcome::NotFound,
        })
    }
}

fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for character in search.chars() {
        if matches!(character, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests;
