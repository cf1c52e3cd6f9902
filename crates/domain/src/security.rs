use serde::{Deserialize, Serialize};

/// Permissions enforced by the product route policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows listing every non-deleted product regardless of status.
    ViewAllProducts,
    /// Allows listing active products only.
    ViewActiveProducts,
    /// Allows creating products.
    CreateProducts,
    /// Allows updating product fields, images and status.
    UpdateProducts,
    /// Allows soft-deleting products.
    DeleteProducts,
}

impl Permission {
    /// Returns the permission string stored in the role cache.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewAllProducts => "view_all_products",
            Self::ViewActiveProducts => "view_active_products",
            Self::CreateProducts => "create_products",
            Self::UpdateProducts => "update_products",
            Self::DeleteProducts => "delete_products",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Permission;

    #[test]
    fn permissions_use_role_cache_names() {
        assert_eq!(Permission::ViewAllProducts.as_str(), "view_all_products");
        assert_eq!(Permission::ViewActiveProducts.as_str(), "view_active_products");
        assert_eq!(Permission::DeleteProducts.as_str(), "delete_products");
    }
}
