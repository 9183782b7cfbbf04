//! Update Accountability Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::AccountabilityUpdated;
use crate::accountability::AccountabilityRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountabilityCommand {
    pub accountability_id: String,
    pub title: String,
}

pub struct UpdateAccountabilityUseCase<U: UnitOfWork> {
    accountability_repo: Arc<AccountabilityRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateAccountabilityUseCase<U> {
    pub fn new(accountability_repo: Arc<AccountabilityRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            accountability_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateAccountabilityCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<AccountabilityUpdated> {
        let Some(title) = required_text(&command.title) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Accountability title cannot be blank",
            ));
        };

        let mut accountability = match self
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

        accountability.retitle(&title);
        let event = AccountabilityUpdated::new(&ctx, &accountability.id, &accountability.title);
        self.unit_of_work.commit(&accountability, event, &command).await
    }
}
