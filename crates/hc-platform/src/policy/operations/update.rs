//! Update Policy Use Case

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::events::PolicyUpdated;
use crate::policy::PolicyRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyCommand {
    pub policy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct UpdatePolicyUseCase<U: UnitOfWork> {
    policy_repo: Arc<PolicyRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdatePolicyUseCase<U> {
    pub fn new(policy_repo: Arc<PolicyRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            policy_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdatePolicyCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PolicyUpdated> {
        let mut policy = match self.policy_repo.find_by_id(&command.policy_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "POLICY_NOT_FOUND",
                    format!("Policy '{}' not found", command.policy_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch policy: {}",
                    e
                )));
            }
        };

        if let Some(ref title) = command.title {
            let Some(title) = required_text(title) else {
                return UseCaseResult::failure(UseCaseError::validation(
                    "TITLE_REQUIRED",
                    "Policy title cannot be blank",
                ));
            };
            policy.title = title;
        }
        if let Some(ref description) = command.description {
            policy.description = required_text(description);
        }
        policy.updated_at = Utc::now();

        let event = PolicyUpdated::new(&ctx, &policy.id, &policy.title);
        self.unit_of_work.commit(&policy, event, &command).await
    }
}
