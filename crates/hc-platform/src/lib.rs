//! Holacracy Platform
//!
//! Core platform providing:
//! - Organizations with an anchor circle and its core roles
//! - Nested circles, roles and role assignments
//! - Partners (a user's membership in an organization) and invitations
//! - Domains, policies and accountabilities owned by roles
//! - Use Case pattern with guaranteed audit logging
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints
//! - `operations` - Use case operations

// Core aggregates
pub mod user;
pub mod organization;
pub mod partner;
pub mod invitation;

// Governance aggregates
pub mod circle;
pub mod role;
pub mod domain;
pub mod policy;
pub mod accountability;

// Authentication & audit
pub mod identity;
pub mod audit;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod usecase;
pub mod app;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::tsid::TsidGenerator;

// Re-export use case infrastructure
pub use usecase::{
    DomainEvent, ExecutionContext, SqliteUnitOfWork, UnitOfWork, UseCaseError, UseCaseResult,
};
// Note: impl_domain_event! macro is automatically exported at crate root via #[macro_export]

// Re-export main entity types for convenience
pub use user::entity::User;
pub use organization::entity::Organization;
pub use partner::entity::{Partner, PartnerType};
pub use invitation::entity::{Invitation, InvitationStatus};
pub use circle::entity::{Circle, CircleMembership};
pub use role::entity::{Role, RoleAssignment, RoleType};
pub use domain::entity::Domain;
pub use policy::entity::Policy;
pub use accountability::entity::Accountability;
pub use audit::entity::{AuditLog, StoredEvent};
pub use identity::{ExternalIdentity, IdentityError, IdentityResolver};

// Re-export repositories
pub use user::repository::UserRepository;
pub use organization::repository::OrganizationRepository;
pub use partner::repository::PartnerRepository;
pub use invitation::repository::InvitationRepository;
pub use circle::repository::CircleRepository;
pub use role::repository::RoleRepository;
pub use domain::repository::DomainRepository;
pub use policy::repository::PolicyRepository;
pub use accountability::repository::AccountabilityRepository;
pub use audit::repository::AuditLogRepository;

pub use app::build_app;

/// API re-exports
pub mod api {
    // Middleware
    pub use crate::shared::middleware::{AuthLayer, AuthState, Authenticated};
    pub use crate::shared::api_common::{ErrorEnvelope, ErrorItem, SuccessResponse};

    // API state and router exports from each aggregate
    pub use crate::user::api::{users_router, UsersState};
    pub use crate::organization::api::{my_organizations_router, organizations_router, OrganizationsState};
    pub use crate::partner::api::{partners_router, PartnersState};
    pub use crate::invitation::api::{invitations_router, InvitationsState};
    pub use crate::circle::api::{circles_router, CirclesState};
    pub use crate::role::api::{roles_router, RolesState};
    pub use crate::domain::api::{domains_router, DomainsState};
    pub use crate::policy::api::{policies_router, PoliciesState};
    pub use crate::accountability::api::{accountabilities_router, AccountabilitiesState};
}
