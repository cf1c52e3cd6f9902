use std::sync::Arc;

use catalog_core::{BearerToken, Principal};
use tracing::{debug, warn};

use crate::{AuthRejection, IdentityVerifier, PermissionCacheStore};

mod policy;

pub use policy::{PermissionRequirement, PolicyDecision, authorize};

/// Resolves bearer tokens into principals carrying their role permissions.
#[derive(Clone)]
pub struct AuthorizationResolver {
    identity_verifier: Arc<dyn IdentityVerifier>,
    permission_store: Arc<dyn PermissionCacheStore>,
    namespace: String,
}

impl AuthorizationResolver {
    /// Creates a resolver reading role permissions under `namespace`.
    #[must_use]
    pub fn new(
        identity_verifier: Arc<dyn IdentityVerifier>,
        permission_store: Arc<dyn PermissionCacheStore>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            identity_verifier,
            permission_store,
            namespace: namespace.into(),
        }
    }

    /// Returns the cache key holding the permissions of a role.
    #[must_use]
    pub fn permission_key(&self, role: &str) -> String {
        format!("{}:{role}", self.namespace)
    }

    /// Resolves the raw `Authorization` header value into a principal.
    ///
    /// Fails closed: no failure ever yields a principal.
    pub async fn resolve(&self, authorization: Option<&str>) -> Result<Principal, AuthRejection> {
        let token = BearerToken::from_authorization_header(authorization)
            .ok_or(AuthRejection::MissingToken)?;
        let identity = self.identity_verifier.verify(&token).await?;
        let permissions = self.load_permissions(identity.role()).await?;

        Ok(Principal::new(identity, permissions))
    }

    async fn load_permissions(&self, role: &str) -> Result<Vec<String>, AuthRejection> {
        let key = self.permission_key(role);
        debug!(%key, "fetching role permissions");

        let cached = match self.permission_store.get(key.as_str()).await {
            Ok(Some(cached)) => cached,
            Ok(None) => {
                warn!(%key, "role permissions are not cached");
                return Err(AuthRejection::PermissionLookupFailed);
            }
            Err(error) => {
                warn!(%key, %error, "permission cache lookup failed");
                return Err(AuthRejection::PermissionLookupFailed);
            }
        };

        serde_json::from_str::<Vec<String>>(cached.as_str()).map_err(|error| {
            warn!(%key, %error, "cached role permissions are malformed");
            AuthRejection::PermissionLookupFailed
        })
    }
}

#[cfg(test)]
mod tests;
