//! Delete Domain Use Case
//!
//! Hard delete; the domain's policies are removed with it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::DomainDeleted;
use crate::domain::DomainRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDomainCommand {
    pub domain_id: String,
}

pub struct DeleteDomainUseCase<U: UnitOfWork> {
    domain_repo: Arc<DomainRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> DeleteDomainUseCase<U> {
    pub fn new(domain_repo: Arc<DomainRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            domain_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteDomainCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<DomainDeleted> {
        let domain = match self.domain_repo.find_by_id(&command.domain_id).await {
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

        let event = DomainDeleted::new(&ctx, &domain.id, &domain.role_id);
        self.unit_of_work.commit_remove(&domain, event, &command).await
    }
}
