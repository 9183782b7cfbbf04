//! Resend Invitation Use Case
//!
//! There is no mail delivery; resending is not supported.

use serde::{Deserialize, Serialize};

use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendInvitationCommand {
    pub invitation_id: String,
}

#[derive(Debug, Default)]
pub struct ResendInvitationUseCase;

impl ResendInvitationUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        command: ResendInvitationCommand,
        _ctx: ExecutionContext,
    ) -> UseCaseResult<()> {
        UseCaseResult::failure(UseCaseError::not_implemented(
            "RESEND_NOT_IMPLEMENTED",
            format!("Resend of invitation '{}'", command.invitation_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resend_is_not_implemented() {
        let result = ResendInvitationUseCase::new()
            .execute(
                ResendInvitationCommand { invitation_id: "I1".to_string() },
                ExecutionContext::create("auth0|alice"),
            )
            .await;

        let err = result.error().expect("resend must fail");
        assert_eq!(err.http_status_code(), 501);
    }
}
