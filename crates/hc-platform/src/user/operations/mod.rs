//! User Operations

pub mod events;
pub mod register;
pub mod update;
pub mod delete;

pub use events::{UserDeleted, UserReactivated, UserRegistered, UserUpdated};

pub use register::{Registration, RegisterUserCommand, RegisterUserUseCase};
pub use update::{UpdateUserCommand, UpdateUserUseCase};
pub use delete::{DeleteUserCommand, DeleteUserUseCase};
