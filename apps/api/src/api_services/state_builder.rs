use std::sync::Arc;

use catalog_application::{AuthorizationResolver, ProductService};
use catalog_core::AppError;
use catalog_infrastructure::{
    HttpIdentityVerifier, PostgresProductRepository, RedisPermissionCacheStore,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::storage::build_asset_storage;

pub async fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let redis_client = redis::Client::open(config.redis_url.as_str()).map_err(|error| {
        AppError::Validation(format!("invalid redis url for permission cache: {error}"))
    })?;
    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let authorization_resolver = AuthorizationResolver::new(
        Arc::new(HttpIdentityVerifier::new(
            http_client,
            config.user_auth_access_url.as_str(),
            config.identity_timeout,
        )),
        Arc::new(RedisPermissionCacheStore::new(redis_client.clone())),
        config.permission_cache_namespace.as_str(),
    );

    let product_service = ProductService::new(
        Arc::new(PostgresProductRepository::new(pool.clone())),
        build_asset_storage(config).await,
    );

    Ok(AppState {
        authorization_resolver,
        product_service,
        postgres_pool: pool,
        redis_client,
    })
}
