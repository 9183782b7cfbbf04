//! Accountability Aggregate
//!
//! Ongoing activities a role is expected to perform.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::Accountability;
pub use repository::AccountabilityRepository;
pub use api::{
    accountabilities_router, AccountabilitiesState, AccountabilityListResponse,
    AccountabilityResponse,
};
