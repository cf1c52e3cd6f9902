use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use catalog_application::PermissionRequirement;
use catalog_domain::Permission;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_listing_routes() -> Router<AppState> {
    let requirement = PermissionRequirement::any_of([
        Permission::ViewAllProducts,
        Permission::ViewActiveProducts,
    ]);

    Router::new()
        .route("/products", get(handlers::products::list_products_handler))
        .route_layer(from_fn(middleware::require_permission))
        .layer(axum::Extension(requirement))
}

pub(super) fn build_create_routes() -> Router<AppState> {
    let requirement = PermissionRequirement::hold(Permission::CreateProducts);

    Router::new()
        .route(
            "/products/create",
            post(handlers::products::create_product_handler),
        )
        .route_layer(from_fn(middleware::require_permission))
        .layer(axum::Extension(requirement))
}

pub(super) fn build_update_routes() -> Router<AppState> {
    let requirement = PermissionRequirement::hold(Permission::UpdateProducts);

    Router::new()
        .route(
            "/products/update/{id}",
            put(handlers::products::update_product_handler),
        )
        .route(
            "/products/update-status/{id}",
            put(handlers::products::update_product_status_handler),
        )
        .route_layer(from_fn(middleware::require_permission))
        .layer(axum::Extension(requirement))
}

pub(super) fn build_delete_routes() -> Router<AppState> {
    let requirement = PermissionRequirement::hold(Permission::DeleteProducts);

    Router::new()
        .route(
            "/products/delete/{id}",
            delete(handlers::products::delete_product_handler),
        )
        .route_layer(from_fn(middleware::require_permission))
        .layer(axum::Extension(requirement))
}
