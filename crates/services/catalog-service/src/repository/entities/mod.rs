//! SeaORM entities.

pub mod family_assignment;
pub mod product;
pub mod product_country;
pub mod product_type;
pub mod product_video;
pub mod product_workflow;
pub mod role;
pub mod status;
pub mod user;
