use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::{AppError, AppResult, BearerToken, Identity, Principal};
use catalog_domain::Permission;
use tokio::sync::Mutex;

use crate::{AuthRejection, IdentityVerifier, PermissionCacheStore};

use super::{AuthorizationResolver, PermissionRequirement, PolicyDecision, authorize};

struct FakeIdentityVerifier {
    identities: HashMap<String, Result<Identity, AuthRejection>>,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeIdentityVerifier {
    fn new(entries: impl IntoIterator<Item = (&'static str, Result<Identity, AuthRejection>)>) -> Self {
        Self {
            identities: entries
                .into_iter()
                .map(|(token, outcome)| (token.to_owned(), outcome))
                .collect(),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl IdentityVerifier for FakeIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<Identity, AuthRejection> {
        self.seen_tokens.lock().await.push(token.as_str().to_owned());
        self.identities
            .get(token.as_str())
            .cloned()
            .unwrap_or(Err(AuthRejection::UpstreamUnauthorized))
    }
}

#[derive(Default)]
struct FakePermissionCacheStore {
    entries: HashMap<String, String>,
    unreachable: bool,
    requested_keys: Mutex<Vec<String>>,
}

#[async_trait]
impl PermissionCacheStore for FakePermissionCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.requested_keys.lock().await.push(key.to_owned());
        if self.unreachable {
            return Err(AppError::Unavailable("connection refused".to_owned()));
        }

        Ok(self.entries.get(key).cloned())
    }
}

fn resolver_with(
    identity_verifier: FakeIdentityVerifier,
    store: FakePermissionCacheStore,
) -> (AuthorizationResolver, Arc<FakePermissionCacheStore>) {
    let store = Arc::new(store);
    let resolver = AuthorizationResolver::new(Arc::new(identity_verifier), store.clone(), "catalog_role");
    (resolver, store)
}

fn admin_verifier() -> FakeIdentityVerifier {
    FakeIdentityVerifier::new([(
        "admin-token",
        Ok(Identity::new("admin@example.com", "admin")),
    )])
}

fn store_with(entries: &[(&str, &str)]) -> FakePermissionCacheStore {
    FakePermissionCacheStore {
        entries: entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect(),
        ..FakePermissionCacheStore::default()
    }
}

#[tokio::test]
async fn resolve_yields_exact_cached_permission_set() {
    let (resolver, store) = resolver_with(
        admin_verifier(),
        store_with(&[(
            "catalog_role:admin",
            r#"["update_products","create_products","view_all_products","create_products"]"#,
        )]),
    );

    let principal = resolver.resolve(Some("Bearer admin-token")).await;
    let Ok(principal) = principal else {
        panic!("expected principal");
    };

    assert_eq!(principal.identity().email(), "admin@example.com");
    assert_eq!(
        principal.permissions(),
        &BTreeSet::from([
            "create_products".to_owned(),
            "update_products".to_owned(),
            "view_all_products".to_owned(),
        ])
    );
    assert_eq!(
        store.requested_keys.lock().await.as_slice(),
        ["catalog_role:admin".to_owned()]
    );
}

#[tokio::test]
async fn resolve_rejects_missing_header_without_calling_upstream() {
    let verifier = Arc::new(admin_verifier());
    let resolver = AuthorizationResolver::new(
        verifier.clone(),
        Arc::new(FakePermissionCacheStore::default()),
        "catalog_role",
    );

    assert_eq!(
        resolver.resolve(None).await,
        Err(AuthRejection::MissingToken)
    );
    assert_eq!(
        resolver.resolve(Some("Token admin-token")).await,
        Err(AuthRejection::MissingToken)
    );
    assert!(verifier.seen_tokens.lock().await.is_empty());
}

#[tokio::test]
async fn resolve_passes_identity_rejections_through() {
    let (resolver, store) = resolver_with(
        FakeIdentityVerifier::new([
            ("down", Err(AuthRejection::UpstreamUnavailable)),
            ("garbled", Err(AuthRejection::UpstreamMalformed)),
        ]),
        store_with(&[("catalog_role:admin", r#"["view_all_products"]"#)]),
    );

    assert_eq!(
        resolver.resolve(Some("Bearer down")).await,
        Err(AuthRejection::UpstreamUnavailable)
    );
    assert_eq!(
        resolver.resolve(Some("Bearer garbled")).await,
        Err(AuthRejection::UpstreamMalformed)
    );
    assert_eq!(
        resolver.resolve(Some("Bearer unknown")).await,
        Err(AuthRejection::UpstreamUnauthorized)
    );
    assert!(store.requested_keys.lock().await.is_empty());
}

#[tokio::test]
async fn resolve_fails_for_missing_or_malformed_entries() {
    for cached in [None, Some("not json"), Some(r#"{"0":"view_all_products"}"#), Some("[1, 2]")] {
        let entries = cached
            .map(|value| vec![("catalog_role:admin", value)])
            .unwrap_or_default();
        let (resolver, _) = resolver_with(admin_verifier(), store_with(&entries));

        assert_eq!(
            resolver.resolve(Some("Bearer admin-token")).await,
            Err(AuthRejection::PermissionLookupFailed),
            "cached value {cached:?}"
        );
    }
}

#[tokio::test]
async fn resolve_fails_when_store_is_unreachable() {
    let (resolver, _) = resolver_with(
        admin_verifier(),
        FakePermissionCacheStore {
            unreachable: true,
            ..FakePermissionCacheStore::default()
        },
    );

    assert_eq!(
        resolver.resolve(Some("Bearer admin-token")).await,
        Err(AuthRejection::PermissionLookupFailed)
    );
}

#[tokio::test]
async fn empty_cached_list_is_a_valid_principal() {
    let (resolver, _) = resolver_with(
        admin_verifier(),
        store_with(&[("catalog_role:admin", "[]")]),
    );

    let principal = resolver.resolve(Some("Bearer admin-token")).await;
    assert!(principal.is_ok_and(|principal| principal.permissions().is_empty()));
}

#[test]
fn rejections_map_to_distinct_error_classes() {
    assert!(matches!(
        AppError::from(AuthRejection::UpstreamUnavailable),
        AppError::Unauthorized(_)
    ));
    assert!(matches!(
        AppError::from(AuthRejection::MissingToken),
        AppError::Unauthorized(_)
    ));
    assert!(matches!(
        AppError::from(AuthRejection::PermissionLookupFailed),
        AppError::Forbidden(_)
    ));
}

fn principal_with(permissions: &[&str]) -> Principal {
    Principal::new(
        Identity::new("user@example.com", "user"),
        permissions.iter().map(|permission| (*permission).to_owned()),
    )
}

#[test]
fn any_of_allows_when_one_permission_is_held() {
    let requirement =
        PermissionRequirement::any_of([Permission::ViewAllProducts, Permission::ViewActiveProducts]);

    for held in [
        vec!["view_all_products"],
        vec!["view_active_products"],
        vec!["view_active_products", "view_all_products"],
    ] {
        assert_eq!(
            authorize(&principal_with(&held), &requirement),
            PolicyDecision::Allow
        );
    }
}

#[test]
fn any_of_denies_when_no_permission_is_held() {
    let requirement =
        PermissionRequirement::any_of([Permission::ViewAllProducts, Permission::ViewActiveProducts]);

    assert_eq!(
        authorize(&principal_with(&["create_products"]), &requirement),
        PolicyDecision::Deny
    );
    assert_eq!(
        authorize(&principal_with(&[]), &requirement),
        PolicyDecision::Deny
    );
}

#[test]
fn hold_requires_the_exact_permission() {
    let requirement = PermissionRequirement::hold(Permission::DeleteProducts);

    assert_eq!(
        authorize(&principal_with(&["delete_products"]), &requirement),
        PolicyDecision::Allow
    );

    let denied = authorize(&principal_with(&["update_products"]), &requirement);
    assert_eq!(denied, PolicyDecision::Deny);
    let Err(AppError::Forbidden(message)) = denied.into_result(&requirement) else {
        panic!("expected forbidden error");
    };
    assert_eq!(
        message,
        "permission denied: permission 'delete_products' is required"
    );
}
