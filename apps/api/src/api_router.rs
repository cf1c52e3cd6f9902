use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use catalog_core::AppError;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api_config::ApiConfig;
use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;
mod products;


use cors::build_cors_layer;
use products::{
    build_create_routes, build_delete_routes, build_listing_routes, build_update_routes,
};

pub fn build_router(app_state: AppState, config: &ApiConfig) -> Result<Router, AppError> {
    let product_routes = Router::new()
        .merge(build_listing_routes())
        .merge(build_create_routes())
        .merge(build_update_routes())
        .merge(build_delete_routes())
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::resolve_principal,
        ))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(product_routes)
        .nest_service(
            config.upload_url_prefix.as_str(),
            ServeDir::new(config.upload_dir.as_path()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config.cors_allowed_origin.as_str())?)
        .with_state(app_state))
}
