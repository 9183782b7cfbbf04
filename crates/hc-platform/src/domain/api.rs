//! Domains API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::domain::operations::{
    DeleteDomainCommand, DeleteDomainUseCase, UpdateDomainCommand, UpdateDomainUseCase,
};
use crate::domain::{Domain, DomainRepository};
use crate::policy::operations::{CreatePolicyCommand, CreatePolicyUseCase};
use crate::policy::{PolicyListResponse, PolicyRepository, PolicyResponse};
use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainResponse {
    pub id: String,
    pub title: String,
    pub role_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Domain> for DomainResponse {
    fn from(d: Domain) -> Self {
        Self {
            id: d.id,
            title: d.title,
            role_id: d.role_id,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainListResponse {
    pub items: Vec<DomainResponse>,
    pub total: usize,
}

impl From<Vec<Domain>> for DomainListResponse {
    fn from(domains: Vec<Domain>) -> Self {
        let items: Vec<DomainResponse> = domains.into_iter().map(Into::into).collect();
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDomainRequest {
    pub title: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePolicyRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct DomainsState {
    pub domain_repo: Arc<DomainRepository>,
    pub policy_repo: Arc<PolicyRepository>,
    pub update_use_case: Arc<UpdateDomainUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteDomainUseCase<SqliteUnitOfWork>>,
    pub create_policy_use_case: Arc<CreatePolicyUseCase<SqliteUnitOfWork>>,
}

impl DomainsState {
    async fn domain(&self, id: &str) -> Result<Domain, PlatformError> {
        self.domain_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Domain", id))
    }
}

/// Get domain by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "domains",
    params(("id" = String, Path, description = "Domain ID")),
    responses(
        (status = 200, description = "Domain found", body = DomainResponse),
        (status = 404, description = "Domain not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_domain(
    State(state): State<DomainsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DomainResponse>, PlatformError> {
    let domain = state.domain(&id).await?;
    Ok(Json(domain.into()))
}

/// Retitle domain
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "domains",
    params(("id" = String, Path, description = "Domain ID")),
    request_body = UpdateDomainRequest,
    responses(
        (status = 200, description = "Domain updated", body = DomainResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Domain not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_domain(
    State(state): State<DomainsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateDomainRequest>,
) -> Result<Json<DomainResponse>, PlatformError> {
    let command = UpdateDomainCommand {
        domain_id: id.clone(),
        title: req.title,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let domain = state.domain(&id).await?;
            Ok(Json(domain.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete domain and its policies
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "domains",
    params(("id" = String, Path, description = "Domain ID")),
    responses(
        (status = 200, description = "Domain deleted", body = SuccessResponse),
        (status = 404, description = "Domain not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_domain(
    State(state): State<DomainsState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let command = DeleteDomainCommand { domain_id: id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("Domain deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List policies of the domain
#[utoipa::path(
    get,
    path = "/{id}/policies",
    tag = "domains",
    params(("id" = String, Path, description = "Domain ID")),
    responses(
        (status = 200, description = "Policies", body = PolicyListResponse),
        (status = 404, description = "Domain not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_domain_policies(
    State(state): State<DomainsState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<PolicyListResponse>, PlatformError> {
    let domain = state.domain(&id).await?;
    let policies = state.policy_repo.find_by_domain(&domain.id).await?;
    Ok(Json(policies.into()))
}

/// Create a policy on the domain
#[utoipa::path(
    post,
    path = "/{id}/policies",
    tag = "domains",
    params(("id" = String, Path, description = "Domain ID")),
    request_body = CreatePolicyRequest,
    responses(
        (status = 201, description = "Policy created", body = PolicyResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Domain not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_domain_policy(
    State(state): State<DomainsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    Json(req): Json<CreatePolicyRequest>,
) -> Result<(StatusCode, Json<PolicyResponse>), PlatformError> {
    let command = CreatePolicyCommand {
        domain_id: id,
        title: req.title,
        description: req.description,
    };

    match state.create_policy_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(event) => {
            let policy = state
                .policy_repo
                .find_by_id(&event.policy_id)
                .await?
                .ok_or_else(|| PlatformError::not_found("Policy", &event.policy_id))?;
            Ok((StatusCode::CREATED, Json(policy.into())))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn domains_router(state: DomainsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_domain, update_domain, delete_domain))
        .routes(routes!(list_domain_policies, create_domain_policy))
        .with_state(state)
}
