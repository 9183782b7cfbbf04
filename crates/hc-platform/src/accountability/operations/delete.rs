//! Delete Accountability Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::AccountabilityDeleted;
use crate::accountability::AccountabilityRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountabilityCommand {
    pub accountability_id: String,
}

pub struct DeleteAccountabilityUseCase<U: UnitOfWork> {
    accountability_repo: Arc<AccountabilityRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteAccountabilityUseCase<U> {
    pub fn new(accountability_repo: Arc<AccountabilityRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            accountability_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteAccountabilityCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<AccountabilityDeleted> {
        let accountability = match self
            .accountability_repo
            .find_by_id(&command.accountability_id)
            .await
        {
            Ok(Some(a)) => a,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "ACCOUNTABILITY_NOT_FOUND",
                    format!("Accountability '{}' not found", command.accountability_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch accountability: {}",
                    e
                )));
            }
        };

        let event = AccountabilityDeleted::new(&ctx, &accountability.id);
        self.unit_of_work.commit_remove(&accountability, event, &command).await
    }
}
