use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use catalog_core::AppError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Builds the CORS layer for `CORS_ALLOWED_ORIGIN`.
///
/// `*` allows any origin without credentials; otherwise the value is a
/// comma separated origin list.
pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if allowed_origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origin
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|error| {
                AppError::Internal(format!("invalid CORS_ALLOWED_ORIGIN '{origin}': {error}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(AppError::Internal(
            "CORS_ALLOWED_ORIGIN must name at least one origin".to_owned(),
        ));
    }

    Ok(layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}
