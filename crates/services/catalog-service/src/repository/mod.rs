//! Repository layer for data access.
//!
//! Each repository exposes a mockable read/write trait over the pool and,
//! where multi-row writes need atomicity, a `Tx*` counterpart bound to a
//! transaction handed out by the unit of work.

pub mod entities;
mod assignment_repository;
mod lookup_repository;
mod product_repository;
mod user_repository;
mod video_repository;
mod workflow_repository;

pub use assignment_repository::{
    FamilyAssignmentRepository, FamilyAssignmentStore, TxFamilyAssignmentRepository,
};
pub use lookup_repository::{LookupRepository, LookupStore};
pub use product_repository::{ProductRepository, ProductStore, TxProductRepository};
pub use user_repository::{UserRepository, UserStore};
pub use video_repository::{TxVideoRepository, VideoRepository, VideoStore};
pub use workflow_repository::{TxWorkflowRepository, WorkflowRepository, WorkflowStore};

#[cfg(any(test, feature = "test-utils"))]
pub use assignment_repository::MockFamilyAssignmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use lookup_repository::MockLookupRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use video_repository::MockVideoRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use workflow_repository::MockWorkflowRepository;
