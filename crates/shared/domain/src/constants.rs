//! Domain-level constants.
//!
//! These constants define business rules and seeded lookup values.

// =============================================================================
// User Roles
// =============================================================================

/// Unrestricted write access and user administration
pub const ROLE_ADMINISTRATOR: &str = "administrator";

/// Write access scoped to assigned subfamilies
pub const ROLE_PRODUCT_MANAGER: &str = "product_manager";

/// Read-only role assigned to new users
pub const ROLE_DEFAULT_USER: &str = "default_user";

/// Seeded role rows as `(code, name)`
pub const ROLE_SEED: &[(&str, &str)] = &[
    (ROLE_ADMINISTRATOR, "Administrator"),
    (ROLE_PRODUCT_MANAGER, "Product Manager"),
    (ROLE_DEFAULT_USER, "Default User"),
];

// =============================================================================
// Product Statuses
// =============================================================================

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_EDITING: &str = "editing";
pub const STATUS_PENDING_APPROVAL: &str = "pending_approval";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_DEACTIVATED: &str = "deactivated";

/// Seeded status rows as `(code, name)`
pub const STATUS_SEED: &[(&str, &str)] = &[
    (STATUS_DRAFT, "Draft"),
    (STATUS_EDITING, "Editing"),
    (STATUS_PENDING_APPROVAL, "Pending Approval"),
    (STATUS_PUBLISHED, "Published"),
    (STATUS_DEACTIVATED, "Deactivated"),
];

/// Seeded product type rows as `(code, name)`
pub const PRODUCT_TYPE_SEED: &[(&str, &str)] = &[
    ("simple", "Simple"),
    ("configurable", "Configurable"),
    ("virtual", "Virtual"),
];

// =============================================================================
// Validation
// =============================================================================

/// ISO 3166-1 alpha-2 country code length
pub const COUNTRY_CODE_LENGTH: usize = 2;

/// Maximum SKU length
pub const MAX_SKU_LENGTH: usize = 100;

/// Maximum product name length
pub const MAX_PRODUCT_NAME_LENGTH: usize = 255;

/// Maximum short description length
pub const MAX_SHORT_DESCRIPTION_LENGTH: usize = 193;

/// Maximum video URL length
pub const MAX_VIDEO_URL_LENGTH: usize = 200;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_LIFETIME: &str = "12h";

/// Default refresh token lifetime
pub const DEFAULT_REFRESH_TOKEN_LIFETIME: &str = "7d";

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
