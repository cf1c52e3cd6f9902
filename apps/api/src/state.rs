use catalog_application::{AuthorizationResolver, ProductService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_resolver: AuthorizationResolver,
    pub product_service: ProductService,
    pub postgres_pool: PgPool,
    pub redis_client: redis::Client,
}
