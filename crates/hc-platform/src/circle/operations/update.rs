//! Update Circle Use Case

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::events::CircleUpdated;
use crate::circle::CircleRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCircleCommand {
    pub circle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

pub struct UpdateCircleUseCase<U: UnitOfWork> {
    circle_repo: Arc<CircleRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateCircleUseCase<U> {
    pub fn new(circle_repo: Arc<CircleRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            circle_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateCircleCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<CircleUpdated> {
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

        if let Some(ref name) = command.name {
            let Some(name) = required_text(name) else {
                return UseCaseResult::failure(UseCaseError::validation(
                    "NAME_REQUIRED",
                    "Circle name cannot be blank",
                ));
            };
            circle.name = name;
        }
        if let Some(ref purpose) = command.purpose {
            circle.purpose = required_text(purpose);
        }
        circle.updated_at = Utc::now();

        let event = CircleUpdated::new(&ctx, &circle.id, &circle.name, circle.purpose.as_deref());
        self.unit_of_work.commit(&circle, event, &command).await
    }
}
