use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

const BEARER_PREFIX: &str = "Bearer ";

/// Identity returned by the external identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    email: String,
    role: String,
}

impl Identity {
    /// Creates an identity from verified upstream claims.
    #[must_use]
    pub fn new(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: role.into(),
        }
    }

    /// Returns the verified email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the role used to resolve permissions.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }
}

/// Authenticated identity together with the permissions cached for its role.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    identity: Identity,
    permissions: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal from a verified identity and its permission set.
    #[must_use]
    pub fn new(identity: Identity, permissions: impl IntoIterator<Item = String>) -> Self {
        Self {
            identity,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Returns the verified identity.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns the permission set in sorted order.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns whether the principal holds the permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Raw bearer token extracted from an `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Parses an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// Returns `None` when the header is absent, uses another scheme, or
    /// carries an empty token.
    #[must_use]
    pub fn from_authorization_header(header: Option<&str>) -> Option<Self> {
        let token = header?.strip_prefix(BEARER_PREFIX)?;
        if token.trim().is_empty() {
            return None;
        }

        Some(Self(token.to_owned()))
    }

    /// Returns the token without the scheme prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the header value to forward upstream.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("BearerToken(***)")
    }
}
