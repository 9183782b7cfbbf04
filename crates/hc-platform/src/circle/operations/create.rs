//! Create Child Circle Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::CircleCreated;
use crate::circle::{Circle, CircleRepository};
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCircleCommand {
    pub parent_circle_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

pub struct CreateCircleUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateCircleUseCase<U> {
    pub fn new(circle_repo: Arc<CircleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            circle_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateCircleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<CircleCreated> {
        let Some(name) = required_text(&command.name) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Circle name is required",
            ));
        };

        let parent = match self.circle_repo.find_active(&command.parent_circle_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CIRCLE_NOT_FOUND",
                    format!("Circle '{}' not found", command.parent_circle_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch circle: {}",
                    e
                )));
            }
        };

        let purpose = command.purpose.as_deref().and_then(required_text);
        let circle = Circle::child_of(&parent, &name, purpose);
        let event = CircleCreated::new(
            &ctx,
            &circle.id,
            &circle.organization_id,
            circle.parent_circle_id.as_deref(),
            &circle.name,
        );

        self.unit_of_work.commit(&circle, event, &command).await
    }
}
