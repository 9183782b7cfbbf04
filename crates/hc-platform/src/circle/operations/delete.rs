//! Delete Circle Use Case
//!
//! Soft delete. The anchor circle goes only with its organization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::CircleDeleted;
use crate::circle::CircleRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCircleCommand {
    pub circle_id: String,
}

pub struct DeleteCircleUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteCircleUseCase<U> {
    pub fn new(circle_repo: Arc<CircleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            circle_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteCircleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<CircleDeleted> {
        let mut circle = match self.circle_repo.find_active(&command.circle_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CIRCLE_NOT_FOUND",
                    format!("Circle '{}' not found", command.circle_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch circle: {}",
                    e
                )));
            }
        };

        if circle.is_anchor() {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "ANCHOR_CIRCLE",
                format!("Circle '{}' is the anchor circle of its organization", circle.id),
            ));
        }

        circle.soft_delete();
        let event = CircleDeleted::new(&ctx, &circle.id);
        self.unit_of_work.commit(&circle, event, &command).await
    }
}
