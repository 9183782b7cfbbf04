//! Update Domain Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::DomainUpdated;
use crate::domain::DomainRepository;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDomainCommand {
    pub domain_id: String,
    pub title: String,
}

pub struct UpdateDomainUseCase<U: UnitOfWork> {
    domain_repo: Arc<DomainRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateDomainUseCase<U> {
    pub fn new(domain_repo: Arc<DomainRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            domain_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateDomainCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<DomainUpdated> {
        let Some(title) = required_text(&command.title) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Domain title cannot be blank",
            ));
        };

        let mut domain = match self.domain_repo.find_by_id(&command.domain_id).await {
            Ok(Some(d)) => d,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "DOMAIN_NOT_FOUND",
                    format!("Domain '{}' not found", command.domain_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch domain: {}",
                    e
                )));
            }
        };

        domain.retitle(&title);
        let event = DomainUpdated::new(&ctx, &domain.id, &domain.title);
        self.unit_of_work.commit(&domain, event, &command).await
    }
}
