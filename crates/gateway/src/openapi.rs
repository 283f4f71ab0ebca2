//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{GoogleLoginRequest, RefreshRequest};
use crate::handlers::user_handler::UpdateUserRequest;
use crate::handlers::video_handler::{VideoRequest, VideoUpdateRequest};
use auth_service_lib::service::{LoginResponse, RefreshResponse};
use domain::{
    AssignmentInput, CountrySettingInput, FamilyAssignment, LookupRef, ProductCountrySetting,
    ProductPatch, ProductResponse, ProductStatus, ProductVideo, RelatedUser, Role,
    StatusChangeRequest, UserResponse, UserSummary, WorkflowActor, WorkflowEntry,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::google_login,
        crate::handlers::auth_handler::refresh_token,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::assign_families,
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::change_status,
        crate::handlers::product_handler::product_history,
        crate::handlers::video_handler::list_videos,
        crate::handlers::video_handler::add_video,
        crate::handlers::video_handler::replace_videos,
        crate::handlers::video_handler::get_video,
        crate::handlers::video_handler::update_video,
        crate::handlers::video_handler::delete_video,
    ),
    components(
        schemas(
            GoogleLoginRequest,
            RefreshRequest,
            LoginResponse,
            RefreshResponse,
            UserSummary,
            UserResponse,
            UpdateUserRequest,
            Role,
            AssignmentInput,
            FamilyAssignment,
            LookupRef,
            ProductStatus,
            ProductResponse,
            ProductPatch,
            CountrySettingInput,
            ProductCountrySetting,
            RelatedUser,
            StatusChangeRequest,
            WorkflowActor,
            WorkflowEntry,
            VideoRequest,
            VideoUpdateRequest,
            ProductVideo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Google sign-in and token refresh"),
        (name = "Users", description = "User management and family assignments"),
        (name = "Products", description = "Product catalog and status workflow"),
        (name = "Videos", description = "Product videos"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
