//! Role Aggregate
//!
//! Roles live inside a circle. The lead link, secretary and facilitator
//! roles are created with the anchor circle; a `circle` role stands for a
//! sub-circle.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Role, RoleAssignment, RoleType};
pub use repository::RoleRepository;
pub use api::{roles_router, RoleListResponse, RoleResponse, RolesState};
