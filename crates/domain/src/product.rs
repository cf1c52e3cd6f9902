//! Product catalog entity and input validation rules.

use catalog_core::{AppError, AppResult, FieldErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of characters in a product name.
pub const PRODUCT_NAME_MIN_LENGTH: usize = 3;

/// Largest price the `NUMERIC(10,2)` price column holds.
pub const PRODUCT_PRICE_MAX: f64 = 99_999_999.99;

/// Unique identifier for a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(i64);

impl ProductId {
    /// Creates a product identifier from a stored value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Visibility flag of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Hidden from callers limited to active products.
    Inactive,
    /// Visible to every caller allowed to list products.
    Active,
}

impl ProductStatus {
    /// Returns the stored numeric value.
    #[must_use]
    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    /// Parses a stored or transport numeric value.
    pub fn from_i16(value: i16) -> AppResult<Self> {
        match value {
            0 => Ok(Self::Inactive),
            1 => Ok(Self::Active),
            _ => Err(AppError::Validation(format!(
                "unknown product status value '{value}'"
            ))),
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Inactive => Self::Active,
            Self::Active => Self::Inactive,
        }
    }
}

/// Validated, user-editable product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Unit price, always greater than zero.
    pub price: f64,
    /// Units in stock, never negative.
    pub quantity: i32,
}

/// Raw form values submitted for create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    /// Raw `name` form value.
    pub name: Option<String>,
    /// Raw `description` form value.
    pub description: Option<String>,
    /// Raw `price` form value.
    pub price: Option<String>,
    /// Raw `quantity` form value.
    pub quantity: Option<String>,
}

impl ProductInput {
    /// Validates the raw values, collecting messages for every failing field.
    pub fn validate(&self) -> AppResult<ProductFields> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", self.name.as_deref());
        if let Some(name) = name.as_deref() {
            if name.chars().count() < PRODUCT_NAME_MIN_LENGTH {
                errors.push(
                    "name",
                    format!("The name must be at least {PRODUCT_NAME_MIN_LENGTH} characters."),
                );
            }
        }

        let description = required_text(&mut errors, "description", self.description.as_deref());

        let price = required_value(&mut errors, "price", self.price.as_deref()).and_then(|raw| {
            match raw.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    errors.push("price", "The price must be a number.");
                    None
                }
                Ok(value) if value <= 0.0 => {
                    errors.push("price", "The price must be greater than 0.");
                    None
                }
                Ok(value) if value > PRODUCT_PRICE_MAX => {
                    errors.push(
                        "price",
                        format!("The price may not be greater than {PRODUCT_PRICE_MAX:.2}."),
                    );
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push("price", "The price must be a number.");
                    None
                }
            }
        });

        let quantity = required_value(&mut errors, "quantity", self.quantity.as_deref())
            .and_then(|raw| match raw.parse::<i32>() {
                Ok(value) if value < 0 => {
                    errors.push(
                        "quantity",
                        "The quantity must be greater than or equal to 0.",
                    );
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push("quantity", "The quantity must be an integer.");
                    None
                }
            });

        let (Some(name), Some(description), Some(price), Some(quantity)) =
            (name, description, price, quantity)
        else {
            return Err(AppError::InvalidFields(errors));
        };
        errors.into_result()?;

        Ok(ProductFields {
            name,
            description,
            price,
            quantity,
        })
    }
}

fn required_value<'a>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Some(value),
        _ => {
            errors.push(field, format!("The {field} field is required."));
            None
        }
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value {
        None | Some("") => {
            errors.push(field, format!("The {field} field is required."));
            None
        }
        Some(value) if value.trim().is_empty() => {
            errors.push(field, format!("The {field} field must not be blank."));
            None
        }
        Some(value) => Some(value.trim().to_owned()),
    }
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    fields: ProductFields,
    status: ProductStatus,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Rebuilds a product from persisted values.
    #[must_use]
    pub fn hydrate(
        id: ProductId,
        fields: ProductFields,
        status: ProductStatus,
        image_url: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            fields,
            status,
            image_url,
            created_at,
            updated_at,
        }
    }

    /// Returns the product identifier.
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the editable fields.
    #[must_use]
    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> ProductStatus {
        self.status
    }

    /// Returns the reference of the attached image, if any.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the editable fields.
    pub fn apply_fields(&mut self, fields: ProductFields) {
        self.fields = fields;
    }

    /// Attaches a new image reference and returns the previous one.
    pub fn replace_image_url(&mut self, image_url: impl Into<String>) -> Option<String> {
        self.image_url.replace(image_url.into())
    }

    /// Flips the status between active and inactive.
    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    /// Records the time of the latest change.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
