use axum::Extension;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;
use catalog_application::{PermissionRequirement, authorize};
use catalog_core::{AppError, Principal};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Principal resolved for the current request.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()).into())
    }
}

pub async fn resolve_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let principal = state
        .authorization_resolver
        .resolve(authorization.as_deref())
        .await
        .map_err(AppError::from)?;
    debug!(
        email = principal.identity().email(),
        role = principal.identity().role(),
        "request principal resolved"
    );

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub async fn require_permission(
    Extension(requirement): Extension<PermissionRequirement>,
    CurrentPrincipal(principal): CurrentPrincipal,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    authorize(&principal, &requirement).into_result(&requirement)?;
    Ok(next.run(request).await)
}
