//! Register User Use Case
//!
//! Creates the caller's user from the resolved identity, or reactivates a
//! soft-deleted one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::{UserReactivated, UserRegistered};
use crate::identity::ExternalIdentity;
use crate::user::{User, UserReactivation, UserRepository};
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserCommand {
    pub identity: ExternalIdentity,
}

/// Outcome of a registration; the two cases map to 201 and 200.
#[derive(Debug, Clone)]
pub enum Registration {
    Created(UserRegistered),
    Reactivated(UserReactivated),
}

impl Registration {
    pub fn user_id(&self) -> &str {
        match self {
            Registration::Created(e) => &e.user_id,
            Registration::Reactivated(e) => &e.user_id,
        }
    }
}

pub struct RegisterUserUseCase<U: UnitOfWork> {
    user_repo: Arc<UserRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RegisterUserUseCase<U> {
    pub fn new(user_repo: Arc<UserRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            user_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: RegisterUserCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<Registration> {
        let identity = &command.identity;
        if identity.email.trim().is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "EMAIL_REQUIRED",
                "Identity carries no email address",
            ));
        }

        let existing = match self.user_repo.find_by_external_id(&identity.external_id).await {
            Ok(existing) => existing,
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch user: {}",
                    e
                )));
            }
        };

        match existing {
            Some(user) if user.is_active() => UseCaseResult::failure(UseCaseError::already_exists(
                "USER_EXISTS",
                format!("User '{}' already exists", user.id),
            )),
            Some(mut user) => {
                debug!(user_id = %user.id, "Reactivating soft-deleted user");
                user.reactivate(identity);
                let event = UserReactivated::new(&ctx, &user.id);
                self.unit_of_work
                    .commit(&UserReactivation(user), event, &command)
                    .await
                    .map(Registration::Reactivated)
            }
            None => {
                let user = User::from_identity(identity);
                let event = UserRegistered::new(&ctx, &user.id, &user.external_id, &user.email);
                self.unit_of_work
                    .commit(&user, event, &command)
                    .await
                    .map(Registration::Created)
            }
        }
    }
}
