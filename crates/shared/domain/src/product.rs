//! Product aggregate, its per-country settings, videos and workflow history.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::constants::*;
use crate::error::{DomainError, DomainResult};

/// Publication workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ProductStatus {
    Draft,
    Editing,
    PendingApproval,
    Published,
    Deactivated,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 5] = [
        ProductStatus::Draft,
        ProductStatus::Editing,
        ProductStatus::PendingApproval,
        ProductStatus::Published,
        ProductStatus::Deactivated,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ProductStatus::Draft => STATUS_DRAFT,
            ProductStatus::Editing => STATUS_EDITING,
            ProductStatus::PendingApproval => STATUS_PENDING_APPROVAL,
            ProductStatus::Published => STATUS_PUBLISHED,
            ProductStatus::Deactivated => STATUS_DEACTIVATED,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A row of one of the `(id, code, name)` lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LookupRef {
    pub id: i32,
    pub code: String,
    pub name: String,
}

/// Product aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i32,
    pub sku: String,
    pub name: String,
    pub product_type: Option<LookupRef>,
    pub status: Option<LookupRef>,
    pub published: bool,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub specifications: Option<String>,
    pub applications: Option<String>,
    pub brand: Option<String>,
    pub url: Option<String>,
    pub area: Option<String>,
    pub area_code: Option<i32>,
    pub family: Option<String>,
    pub family_code: Option<i32>,
    pub subfamily: Option<String>,
    /// Scoping key for product-manager write access
    pub subfamily_code: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub country_settings: Vec<ProductCountrySetting>,
}

impl Product {
    /// Current status, if set and known
    pub fn current_status(&self) -> Option<ProductStatus> {
        self.status
            .as_ref()
            .and_then(|status| ProductStatus::from_code(&status.code))
    }
}

/// Per-country settings owned by a product, unique by `country_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductCountrySetting {
    pub id: i32,
    pub country_code: String,
    pub enabled: bool,
    pub sellable: bool,
    pub category_code: Option<String>,
    pub category: Option<String>,
    pub related: Option<String>,
    pub substitute: String,
}

/// Absent field stays `None`, explicit `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Incoming country setting. Only the fields present are applied to an
/// existing row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CountrySettingInput {
    pub country_code: Option<String>,
    pub enabled: Option<bool>,
    pub sellable: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub category_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub related: Option<Option<String>>,
    pub substitute: Option<String>,
}

/// Partial product update. Nullable text fields distinguish "leave as is"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub short_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub specifications: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub applications: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub url: Option<Option<String>>,
    pub country_settings: Option<Vec<CountrySettingInput>>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(sku) = &self.sku {
            if sku.trim().is_empty() || sku.chars().count() > MAX_SKU_LENGTH {
                return Err(DomainError::validation(format!(
                    "sku must be between 1 and {} characters",
                    MAX_SKU_LENGTH
                )));
            }
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() || name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
                return Err(DomainError::validation(format!(
                    "name must be between 1 and {} characters",
                    MAX_PRODUCT_NAME_LENGTH
                )));
            }
        }
        if let Some(Some(short)) = &self.short_description {
            if short.chars().count() > MAX_SHORT_DESCRIPTION_LENGTH {
                return Err(DomainError::validation(format!(
                    "short_description must be at most {} characters",
                    MAX_SHORT_DESCRIPTION_LENGTH
                )));
            }
        }
        Ok(())
    }

    /// Apply the scalar fields; country settings are reconciled separately.
    pub fn apply_scalars(&self, product: &mut Product) {
        if let Some(sku) = &self.sku {
            product.sku = sku.clone();
        }
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        let text_fields = [
            (&self.description, &mut product.description),
            (&self.short_description, &mut product.short_description),
            (&self.specifications, &mut product.specifications),
            (&self.applications, &mut product.applications),
            (&self.brand, &mut product.brand),
            (&self.url, &mut product.url),
        ];
        for (incoming, current) in text_fields {
            if let Some(value) = incoming {
                *current = value.clone();
            }
        }
    }
}

/// User with a family assignment covering the product's subfamily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RelatedUser {
    pub email: String,
}

/// Product read model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub related_users: Vec<RelatedUser>,
}

// =============================================================================
// Videos
// =============================================================================

static YOUTUBE_URL: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^https?://([a-z0-9-]+\.)*(youtube\.com|youtu\.be)(/\S*)?$"));

/// Accept only links on a YouTube host.
pub fn validate_youtube_url(url: &str) -> DomainResult<()> {
    if url.is_empty() || url.len() > MAX_VIDEO_URL_LENGTH {
        return Err(DomainError::validation(format!(
            "youtube_url must be between 1 and {} characters",
            MAX_VIDEO_URL_LENGTH
        )));
    }
    let pattern = YOUTUBE_URL
        .as_ref()
        .map_err(|e| DomainError::internal(format!("Invalid regex: {}", e)))?;
    if !pattern.is_match(&url.to_ascii_lowercase()) {
        return Err(DomainError::validation("The URL must be a valid YouTube link"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductVideo {
    pub id: i32,
    pub product_id: i32,
    pub youtube_url: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

/// Changes to a single video; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VideoUpdate {
    pub youtube_url: Option<String>,
    pub order: Option<i32>,
}

impl VideoUpdate {
    pub fn is_empty(&self) -> bool {
        self.youtube_url.is_none() && self.order.is_none()
    }
}

// =============================================================================
// Workflow history
// =============================================================================

/// Acting user as shown in history entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkflowActor {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub picture: String,
}

/// Immutable record of one realized status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WorkflowEntry {
    pub id: i32,
    pub product_id: i32,
    pub user: Option<WorkflowActor>,
    pub old_status: Option<LookupRef>,
    pub new_status: Option<LookupRef>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in ProductStatus::ALL {
            assert_eq!(ProductStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ProductStatus::from_code("archived"), None);
    }

    #[test]
    fn youtube_urls() {
        assert!(validate_youtube_url("https://www.youtube.com/watch?v=2ZXfV3is0HU").is_ok());
        assert!(validate_youtube_url("https://youtu.be/2ZXfV3is0HU").is_ok());
        assert!(validate_youtube_url("https://vimeo.com/12345").is_err());
        assert!(validate_youtube_url("https://youtube.com.evil.io/x").is_err());
        assert!(validate_youtube_url("").is_err());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: ProductPatch =
            serde_json::from_str(r#"{"description": null, "brand": "Acme"}"#).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.brand, Some(Some("Acme".to_string())));
        assert_eq!(patch.url, None);
    }

    #[test]
    fn patch_rejects_blank_sku() {
        let patch = ProductPatch {
            sku: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut product = Product {
            id: 1,
            sku: "SKU-1".into(),
            name: "Drill".into(),
            product_type: None,
            status: None,
            published: false,
            description: Some("old".into()),
            short_description: None,
            specifications: None,
            applications: None,
            brand: Some("Acme".into()),
            url: None,
            area: None,
            area_code: None,
            family: None,
            family_code: None,
            subfamily: None,
            subfamily_code: None,
            created_at: Utc::now(),
            country_settings: Vec::new(),
        };
        let patch = ProductPatch {
            name: Some("Hammer drill".into()),
            description: Some(None),
            ..Default::default()
        };

        patch.apply_scalars(&mut product);
        assert_eq!(product.name, "Hammer drill");
        assert_eq!(product.description, None);
        assert_eq!(product.brand.as_deref(), Some("Acme"));
        assert_eq!(product.sku, "SKU-1");
    }
}
