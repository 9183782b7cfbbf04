//! Create Policy Use Case

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::PolicyCreated;
use crate::domain::DomainRepository;
use crate::policy::Policy;
use crate::shared::api_common::required_text;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyCommand {
    pub domain_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub struct CreatePolicyUseCase<U: UnitOfWork> {
    domain_repo: Arc<DomainRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreatePolicyUseCase<U> {
    pub fn new(domain_repo: Arc<DomainRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            domain_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreatePolicyCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PolicyCreated> {
        let Some(title) = required_text(&command.title) else {
            return UseCaseResult::failure(UseCaseError::validation(
                "TITLE_REQUIRED",
                "Policy title is required",
            ));
        };

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

        let description = command.description.as_deref().and_then(required_text);
        let policy = Policy::new(&domain.id, &title, description);
        let event = PolicyCreated::new(&ctx, &policy.id, &domain.id, &policy.title);
        self.unit_of_work.commit(&policy, event, &command).await
    }
}
