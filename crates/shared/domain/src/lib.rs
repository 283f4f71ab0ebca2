//! Domain layer - Core business entities and the authorization/workflow core.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Services persist what these functions decide.

pub mod constants;
pub mod error;
pub mod family;
pub mod permissions;
pub mod product;
pub mod reconcile;
pub mod user;
pub mod workflow;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use family::{validate_assignments, AssignmentInput, FamilyAssignment, NewAssignment};
pub use product::{
    validate_youtube_url, CountrySettingInput, LookupRef, Product, ProductCountrySetting,
    ProductPatch, ProductResponse, ProductStatus, ProductVideo, RelatedUser, VideoUpdate,
    WorkflowActor, WorkflowEntry,
};
pub use reconcile::{plan_country_settings, CountrySettingsPlan, NewCountrySetting};
pub use user::{IdentityProfile, Principal, Role, User, UserResponse, UserSummary, UserUpdate};
pub use workflow::{
    plan_transition, StatusChangeRequest, StatusTransition, TransitionContext, TransitionRecord,
};
