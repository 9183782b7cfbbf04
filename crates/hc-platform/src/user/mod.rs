//! User Aggregate
//!
//! Platform-level accounts, one per external identity.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{User, UserReactivation};
pub use repository::UserRepository;
pub use api::{users_router, UsersState};
