//! Update User Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::UserUpdated;
use crate::shared::api_common::required_text;
use crate::user::UserRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserCommand {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

pub struct UpdateUserUseCase<U: UnitOfWork> {
    user_repo: Arc<UserRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateUserUseCase<U> {
    pub fn new(user_repo: Arc<UserRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            user_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateUserCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<UserUpdated> {
        let mut user = match self.user_repo.find_by_id(&command.user_id).await {
            Ok(Some(u)) if u.is_active() => u,
            Ok(_) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "USER_NOT_FOUND",
                    format!("User '{}' not found", command.user_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch user: {}",
                    e
                )));
            }
        };

        let first_name = command.first_name.as_deref().and_then(required_text);
        let last_name = command.last_name.as_deref().and_then(required_text);
        user.rename(first_name.clone(), last_name.clone());

        let event = UserUpdated::new(&ctx, &user.id, first_name.as_deref(), last_name.as_deref());
        self.unit_of_work.commit(&user, event, &command).await
    }
}
