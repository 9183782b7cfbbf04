//! Organization Aggregate

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::Organization;
pub use repository::OrganizationRepository;
pub use api::{
    my_organizations_router, organizations_router, OrganizationListResponse, OrganizationResponse,
    OrganizationsState,
};
