//! Accountability Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;

pub use events::{AccountabilityCreated, AccountabilityDeleted, AccountabilityUpdated};

pub use create::{CreateAccountabilityCommand, CreateAccountabilityUseCase};
pub use update::{UpdateAccountabilityCommand, UpdateAccountabilityUseCase};
pub use delete::{DeleteAccountabilityCommand, DeleteAccountabilityUseCase};
