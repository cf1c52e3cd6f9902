//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod filesystem_asset_store;
mod http_identity_verifier;
mod in_memory_permission_cache_store;
mod in_memory_product_repository;
mod postgres_product_repository;
mod redis_permission_cache_store;
mod s3_object_store;

pub use filesystem_asset_store::FilesystemAssetStore;
pub use http_identity_verifier::HttpIdentityVerifier;
pub use in_memory_permission_cache_store::InMemoryPermissionCacheStore;
pub use in_memory_product_repository::InMemoryProductRepository;
pub use postgres_product_repository::PostgresProductRepository;
pub use redis_permission_cache_store::RedisPermissionCacheStore;
pub use s3_object_store::S3ObjectStore;
