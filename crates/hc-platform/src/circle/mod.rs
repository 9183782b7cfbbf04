//! Circle Aggregate
//!
//! Nested governance units. Every organization has exactly one anchor
//! circle (no parent); all other circles hang below it.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Circle, CircleMembership};
pub use repository::CircleRepository;
pub use api::{circles_router, CircleListResponse, CircleResponse, CirclesState};
