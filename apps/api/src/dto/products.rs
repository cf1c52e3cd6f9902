use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// API representation of a product.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-dto.ts"
)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    /// `1` for active, `0` for inactive.
    pub status: i16,
    /// Remote URL or local `/uploads/...` path; empty when no image is attached.
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Success envelope carrying one product.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-response.ts"
)]
pub struct ProductResponse {
    pub status: u16,
    pub message: String,
    pub data: ProductDto,
}

/// Paginated product listing envelope.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-list-response.ts"
)]
pub struct ProductListResponse {
    pub status: u16,
    pub message: String,
    pub data: Vec<ProductDto>,
    pub total: u64,
    pub current_page: usize,
    pub per_page: usize,
    pub total_pages: u64,
    pub error: bool,
}

/// Raw listing query string.
///
/// Values stay textual so that unparseable numbers fall back to defaults.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-list-query.ts"
)]
pub struct ProductListQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
}
