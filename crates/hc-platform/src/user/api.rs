//! Users API
//!
//! The caller's own account: `/register` and `/me`.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::shared::api_common::SuccessResponse;
use crate::shared::error::PlatformError;
use crate::shared::middleware::Authenticated;
use crate::user::operations::{
    DeleteUserCommand, DeleteUserUseCase, RegisterUserCommand, RegisterUserUseCase,
    Registration, UpdateUserCommand, UpdateUserUseCase,
};
use crate::user::{User, UserRepository};
use crate::usecase::{SqliteUnitOfWork, UseCaseResult};

/// User response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub external_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            external_id: u.external_id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

/// Update user request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: Arc<UserRepository>,
    pub register_use_case: Arc<RegisterUserUseCase<SqliteUnitOfWork>>,
    pub update_use_case: Arc<UpdateUserUseCase<SqliteUnitOfWork>>,
    pub delete_use_case: Arc<DeleteUserUseCase<SqliteUnitOfWork>>,
}

impl UsersState {
    /// The caller's live user, or 404
    pub async fn current_user(&self, auth: &Authenticated) -> Result<User, PlatformError> {
        self.user_repo
            .find_active_by_external_id(auth.external_id())
            .await?
            .ok_or_else(|| PlatformError::not_found("User", auth.external_id()))
    }

    async fn register(&self, auth: Authenticated) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
        let command = RegisterUserCommand {
            identity: auth.identity.clone(),
        };

        let registration = match self.register_use_case.execute(command, auth.context()).await {
            UseCaseResult::Success(registration) => registration,
            UseCaseResult::Failure(err) => return Err(err.into()),
        };

        let status = match registration {
            Registration::Created(_) => StatusCode::CREATED,
            Registration::Reactivated(_) => StatusCode::OK,
        };
        let user = self
            .user_repo
            .find_by_id(registration.user_id())
            .await?
            .ok_or_else(|| PlatformError::not_found("User", registration.user_id()))?;

        Ok((status, Json(user.into())))
    }
}

/// Register the caller
#[utoipa::path(
    post,
    path = "/register",
    tag = "users",
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 200, description = "Soft-deleted user reactivated", body = UserResponse),
        (status = 409, description = "User already active")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
    state.register(auth).await
}

/// Register the caller (alias of `/register`)
#[utoipa::path(
    post,
    path = "/me",
    tag = "users",
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 200, description = "Soft-deleted user reactivated", body = UserResponse),
        (status = 409, description = "User already active")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_me(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
    state.register(auth).await
}

/// Get the caller's user
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 404, description = "Caller is not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Result<Json<UserResponse>, PlatformError> {
    let user = state.current_user(&auth).await?;
    Ok(Json(user.into()))
}

/// Update the caller's names
#[utoipa::path(
    put,
    path = "/me",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "Caller is not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<UsersState>,
    auth: Authenticated,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, PlatformError> {
    let user = state.current_user(&auth).await?;
    let command = UpdateUserCommand {
        user_id: user.id.clone(),
        first_name: req.first_name,
        last_name: req.last_name,
    };

    match state.update_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => {
            let user = state.current_user(&auth).await?;
            Ok(Json(user.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Soft-delete the caller and all of their partners
#[utoipa::path(
    delete,
    path = "/me",
    tag = "users",
    responses(
        (status = 200, description = "User deleted", body = SuccessResponse),
        (status = 404, description = "Caller is not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_me(
    State(state): State<UsersState>,
    auth: Authenticated,
) -> Result<Json<SuccessResponse>, PlatformError> {
    let user = state.current_user(&auth).await?;
    let command = DeleteUserCommand { user_id: user.id };

    match state.delete_use_case.execute(command, auth.context()).await {
        UseCaseResult::Success(_event) => Ok(Json(SuccessResponse::ok("User deleted"))),
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register))
        .routes(routes!(register_me, get_me, update_me, delete_me))
        .with_state(state)
}
