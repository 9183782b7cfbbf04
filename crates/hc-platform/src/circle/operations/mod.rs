//! Circle Operations

pub mod events;
pub mod create;
pub mod update;
pub mod delete;
pub mod membership;

pub use events::{CircleCreated, CircleDeleted, CircleMemberAdded, CircleMemberRemoved, CircleUpdated};

pub use create::{CreateCircleCommand, CreateCircleUseCase};
pub use update::{UpdateCircleCommand, UpdateCircleUseCase};
pub use delete::{DeleteCircleCommand, DeleteCircleUseCase};
pub use membership::{
    AddCircleMemberCommand, AddCircleMemberUseCase, RemoveCircleMemberCommand,
    RemoveCircleMemberUseCase,
};
