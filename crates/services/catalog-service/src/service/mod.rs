//! Service layer - catalog use cases over the unit of work.

mod access;
mod assignment_service;
mod product_service;
mod session;
mod user_service;
mod video_service;

pub use assignment_service::{AssignmentManager, AssignmentService};
pub use product_service::{ProductManager, ProductService};
pub use session::SessionRevoker;
pub use user_service::{UserManager, UserService};
pub use video_service::{VideoManager, VideoService};

#[cfg(any(test, feature = "test-utils"))]
pub use assignment_service::MockAssignmentService;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use session::MockSessionRevoker;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
#[cfg(any(test, feature = "test-utils"))]
pub use video_service::MockVideoService;
