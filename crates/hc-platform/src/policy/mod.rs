//! Policy Aggregate

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::Policy;
pub use repository::PolicyRepository;
pub use api::{policies_router, PoliciesState, PolicyListResponse, PolicyResponse};
