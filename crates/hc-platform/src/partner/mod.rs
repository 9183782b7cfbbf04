//! Partner Aggregate
//!
//! A user's membership in one organization.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Partner, PartnerCascade, PartnerRevival, PartnerType};
pub use repository::PartnerRepository;
pub use api::{partners_router, PartnerListResponse, PartnerResponse, PartnersState};
