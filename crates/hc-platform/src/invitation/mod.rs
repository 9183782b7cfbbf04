//! Invitation Aggregate
//!
//! Onboarding by code. Status moves pending -> accepted or
//! pending -> cancelled, both terminal.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Invitation, InvitationStatus};
pub use repository::InvitationRepository;
pub use api::{invitations_router, InvitationListResponse, InvitationResponse, InvitationsState};
