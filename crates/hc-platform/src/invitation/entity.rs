//! Invitation Entity

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::tsid::TsidGenerator;

const CODE_LEN: usize = 32;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Random alphanumeric invitation code
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Cancelled,
}

impl InvitationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }

    /// Only pending invitations move, and only forward.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        matches!(
            (self, next),
            (InvitationStatus::Pending, InvitationStatus::Accepted)
                | (InvitationStatus::Pending, InvitationStatus::Cancelled)
        )
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,

    /// Public lookup key
    pub code: String,

    pub email: String,
    pub status: InvitationStatus,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(organization_id: &str, email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: TsidGenerator::generate(),
            code: generate_code(),
            email: email.to_string(),
            status: InvitationStatus::Pending,
            organization_id: organization_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`; false (and unchanged) if the transition is illegal
    pub fn transition(&mut self, next: InvitationStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.updated_at = Utc::now();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_invitation_is_pending_with_code() {
        let invitation = Invitation::new("ORG1", "a@b.com");
        assert_eq!(invitation.status, InvitationStatus::Pending);
        assert_eq!(invitation.code.len(), 32);
        assert!(invitation.code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }

    #[test]
    fn test_transitions() {
        let mut invitation = Invitation::new("ORG1", "a@b.com");
        assert!(invitation.transition(InvitationStatus::Cancelled));
        assert_eq!(invitation.status, InvitationStatus::Cancelled);

        assert!(!invitation.transition(InvitationStatus::Accepted));
        assert!(!invitation.transition(InvitationStatus::Pending));
        assert_eq!(invitation.status, InvitationStatus::Cancelled);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Cancelled.is_terminal());
        assert!(!InvitationStatus::Accepted.can_transition_to(InvitationStatus::Cancelled));
        assert!(!InvitationStatus::Pending.can_transition_to(InvitationStatus::Pending));
    }
}
