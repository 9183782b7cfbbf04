//! Create Invitation Use Case

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::events::InvitationCreated;
use crate::details;
use crate::invitation::Invitation;
use crate::organization::OrganizationRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Email validation pattern
fn email_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationCommand {
    pub organization_id: String,
    pub email: String,
}

pub struct CreateInvitationUseCase<U: UnitOfWork> {
    organization_repo: Arc<OrganizationRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateInvitationUseCase<U> {
    pub fn new(organization_repo: Arc<OrganizationRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            organization_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateInvitationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<InvitationCreated> {
        let email = command.email.trim();
        if email.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "EMAIL_REQUIRED",
                "Invitation email is required",
            ));
        }
        if !is_valid_email(email) {
            return UseCaseResult::failure(UseCaseError::ValidationError {
                code: "INVALID_EMAIL".to_string(),
                message: format!("'{}' is not a valid email address", email),
                details: details! { "email" => email },
            });
        }

        let organization = match self.organization_repo.find_active(&command.organization_id).await {
            Ok(Some(o)) => o,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "ORGANIZATION_NOT_FOUND",
                    format!("Organization '{}' not found", command.organization_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch organization: {}",
                    e
                )));
            }
        };

        let invitation = Invitation::new(&organization.id, &email.to_lowercase());
        let event = InvitationCreated::new(&ctx, &invitation.id, &organization.id, &invitation.email);
        self.unit_of_work.commit(&invitation, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
    }
}
