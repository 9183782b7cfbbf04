//! Partner Operations

pub mod events;
pub mod update;
pub mod delete;
pub mod admin;

pub use events::{PartnerDeleted, PartnerTypeChanged, PartnerUpdated};

pub use update::{UpdatePartnerCommand, UpdatePartnerUseCase};
pub use delete::{DeletePartnerCommand, DeletePartnerUseCase};
pub use admin::{SetPartnerTypeCommand, SetPartnerTypeUseCase};
