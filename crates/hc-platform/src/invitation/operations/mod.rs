//! Invitation Operations

pub mod events;
pub mod create;
pub mod accept;
pub mod cancel;
pub mod resend;

pub use events::{InvitationAccepted, InvitationCancelled, InvitationCreated};

pub use create::{is_valid_email, CreateInvitationCommand, CreateInvitationUseCase};
pub use accept::{AcceptInvitationCommand, AcceptInvitationUseCase};
pub use cancel::{CancelInvitationCommand, CancelInvitationUseCase};
pub use resend::{ResendInvitationCommand, ResendInvitationUseCase};
