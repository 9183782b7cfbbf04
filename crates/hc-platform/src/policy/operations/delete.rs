//! Delete Policy Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::PolicyDeleted;
use crate::policy::PolicyRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePolicyCommand {
    pub policy_id: String,
}

pub struct DeletePolicyUseCase<U: UnitOfWork> {
    policy_repo: Arc<PolicyRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeletePolicyUseCase<U> {
    pub fn new(policy_repo: Arc<PolicyRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            policy_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeletePolicyCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PolicyDeleted> {
        let policy = match self.policy_repo.find_by_id(&command.policy_id).await {
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

        let event = PolicyDeleted::new(&ctx, &policy.id);
        self.unit_of_work.commit_remove(&policy, event, &command).await
    }
}
