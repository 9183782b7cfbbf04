//! Domain Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;

pub use events::{DomainCreated, DomainDeleted, DomainUpdated};

pub use create::{CreateDomainCommand, CreateDomainUseCase};
pub use update::{UpdateDomainCommand, UpdateDomainUseCase};
pub use delete::{DeleteDomainCommand, DeleteDomainUseCase};
