//! Delete User Use Case
//!
//! Soft delete; every partner of the user is soft-deleted in the same
//! transaction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::UserDeleted;
use crate::partner::PartnerCascade;
use crate::user::UserRepository;
use crate::usecase::{Change, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserCommand {
    pub user_id: String,
}

pub struct DeleteUserUseCase<U: UnitOfWork> {
    user_repo: Arc<UserRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteUserUseCase<U> {
    pub fn new(user_repo: Arc<UserRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            user_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteUserCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<UserDeleted> {
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

        user.soft_delete();
        let event = UserDeleted::new(&ctx, &user.id);
        let cascade = PartnerCascade::User(user.id.clone());

        self.unit_of_work
            .commit_all(vec![Change::save(user), Change::save(cascade)], event, &command)
            .await
    }
}
