//! Policy Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;

pub use events::{PolicyCreated, PolicyDeleted, PolicyUpdated};

pub use create::{CreatePolicyCommand, CreatePolicyUseCase};
pub use update::{UpdatePolicyCommand, UpdatePolicyUseCase};
pub use delete::{DeletePolicyCommand, DeletePolicyUseCase};
