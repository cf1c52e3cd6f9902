use catalog_application::{ProductListRequest, ProductListing};
use catalog_core::{AppError, AppResult};
use catalog_domain::{Product, ProductStatus};
use chrono::SecondsFormat;

use super::{ProductDto, ProductListQueryParams, ProductListResponse, ProductResponse};

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        let fields = product.fields();
        Self {
            id: product.id().as_i64(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            price: fields.price,
            quantity: fields.quantity,
            status: product.status().as_i16(),
            image_url: product.image_url().unwrap_or_default().to_owned(),
            created_at: product
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: product
                .updated_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl ProductResponse {
    pub fn new(status: u16, message: impl Into<String>, product: &Product) -> Self {
        Self {
            status,
            message: message.into(),
            data: ProductDto::from(product),
        }
    }
}

impl From<ProductListing> for ProductListResponse {
    fn from(listing: ProductListing) -> Self {
        Self {
            status: 200,
            message: "Successfully Get Products".to_owned(),
            data: listing.products.iter().map(ProductDto::from).collect(),
            total: listing.total,
            current_page: listing.current_page,
            per_page: listing.per_page,
            total_pages: listing.total_pages,
            error: false,
        }
    }
}

impl ProductListQueryParams {
    /// Normalizes the query; only a malformed `status` is rejected.
    pub fn into_request(self) -> AppResult<ProductListRequest> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i16>()
                    .ok()
                    .and_then(|value| ProductStatus::from_i16(value).ok())
                    .ok_or_else(|| AppError::Validation("Status must be 0 or 1".to_owned()))?,
            ),
        };

        Ok(ProductListRequest::new(
            parse_number(self.page.as_deref()),
            parse_number(self.limit.as_deref()),
            self.search,
            status,
        ))
    }
}

fn parse_number(value: Option<&str>) -> Option<i64> {
    value.and_then(|value| value.trim().parse::<i64>().ok())
}
