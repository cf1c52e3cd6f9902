use async_trait::async_trait;
use catalog_core::{AppError, AppResult, BearerToken, Identity};
use thiserror::Error;

/// Reasons a request could not be resolved to a principal.
///
/// The first four are authentication failures; the last means the identity
/// was valid but its role data could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// The `Authorization` header is absent or not a bearer token.
    #[error("missing or invalid bearer token")]
    MissingToken,

    /// The identity service answered with a non-success status.
    #[error("identity service rejected the token")]
    UpstreamUnauthorized,

    /// The identity service could not be reached.
    #[error("identity service is unavailable")]
    UpstreamUnavailable,

    /// The identity service answered with an unreadable body.
    #[error("identity service returned a malformed response")]
    UpstreamMalformed,

    /// Role permissions were missing, malformed, or unreachable.
    #[error("role permissions could not be resolved")]
    PermissionLookupFailed,
}

impl AuthRejection {
    /// Returns whether the rejection concerns the caller's identity rather
    /// than its role data.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        !matches!(self, Self::PermissionLookupFailed)
    }
}

impl From<AuthRejection> for AppError {
    fn from(value: AuthRejection) -> Self {
        if value.is_authentication_failure() {
            AppError::Unauthorized(value.to_string())
        } else {
            AppError::Forbidden(value.to_string())
        }
    }
}

/// Port for delegated bearer-token verification.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verifies a bearer token with the identity service.
    async fn verify(&self, token: &BearerToken) -> Result<Identity, AuthRejection>;
}

/// Read-only port over the role permission cache.
#[async_trait]
pub trait PermissionCacheStore: Send + Sync {
    /// Returns the raw cached value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
}
