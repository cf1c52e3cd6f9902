//! Application services and ports.

#![forbid(unsafe_code)]

mod asset_ports;
mod asset_storage_service;
mod auth_ports;
mod authorization_service;
mod product_ports;
mod product_service;
#[cfg(test)]
mod test_support;

pub use asset_ports::{AssetUpload, LocalAssetStore, LocalRemoval, RemoteObjectStore};
pub use asset_storage_service::AssetStorageService;
pub use auth_ports::{AuthRejection, IdentityVerifier, PermissionCacheStore};
pub use authorization_service::{
    AuthorizationResolver, PermissionRequirement, PolicyDecision, authorize,
};
pub use product_ports::{
    NewProduct, ProductListQuery, ProductPage, ProductRepository, SoftDeleteOutcome,
};
pub use product_service::{DEFAULT_PAGE_SIZE, ProductListRequest, ProductListing, ProductService};
