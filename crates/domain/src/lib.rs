//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod asset;
mod product;
mod security;

pub use asset::{
    AssetLocation, BucketLayout, StoredAsset, file_name_from_reference, is_image_file_name,
    local_file_name,
};
pub use product::{
    PRODUCT_NAME_MIN_LENGTH, PRODUCT_PRICE_MAX, Product, ProductFields, ProductId, ProductInput,
    ProductStatus,
};
pub use security::Permission;
