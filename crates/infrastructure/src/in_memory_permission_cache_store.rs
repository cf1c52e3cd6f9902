use std::collections::HashMap;

use async_trait::async_trait;
use catalog_application::PermissionCacheStore;
use catalog_core::AppResult;
use tokio::sync::RwLock;

/// In-memory permission cache store.
#[derive(Debug, Default)]
pub struct InMemoryPermissionCacheStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryPermissionCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw entry under `key`.
    pub async fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().await.insert(key.into(), value.into());
    }

    /// Stores a role permission list encoded as a JSON array under `key`.
    pub async fn insert_permissions(&self, key: impl Into<String>, permissions: &[&str]) {
        let encoded = serde_json::Value::from(
            permissions
                .iter()
                .map(|permission| serde_json::Value::from(*permission))
                .collect::<Vec<_>>(),
        )
        .to_string();
        self.insert(key, encoded).await;
    }
}

#[async_trait]
impl PermissionCacheStore for InMemoryPermissionCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use catalog_application::PermissionCacheStore;

    use super::InMemoryPermissionCacheStore;

    #[tokio::test]
    async fn stored_permissions_are_json_arrays() {
        let store = InMemoryPermissionCacheStore::new();
        store
            .insert_permissions("laravel_database_role:editor", &["create_products"])
            .await;

        assert_eq!(
            store.get("laravel_database_role:editor").await.ok().flatten(),
            Some(r#"["create_products"]"#.to_owned())
        );
        assert_eq!(store.get("laravel_database_role:none").await.ok().flatten(), None);
    }
}
