//! Organization Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;

pub use events::{OrganizationCreated, OrganizationDeleted, OrganizationUpdated};

pub use create::{CreateOrganizationCommand, CreateOrganizationUseCase};
pub use update::{UpdateOrganizationCommand, UpdateOrganizationUseCase};
pub use delete::{DeleteOrganizationCommand, DeleteOrganizationUseCase};
