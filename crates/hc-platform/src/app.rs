//! Application Assembly
//!
//! Wires repositories, use cases and per-aggregate routers into one axum
//! `Router`. The server binary and the HTTP integration tests both build the
//! application through [`build_app`].

use std::sync::Arc;

use axum::{http::HeaderValue, response::Json, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use hc_config::HttpConfig;

use crate::accountability::operations::{
    CreateAccountabilityUseCase, DeleteAccountabilityUseCase, UpdateAccountabilityUseCase,
};
use crate::accountability::{accountabilities_router, AccountabilitiesState, AccountabilityRepository};
use crate::circle::operations::{
    AddCircleMemberUseCase, CreateCircleUseCase, DeleteCircleUseCase, RemoveCircleMemberUseCase,
    UpdateCircleUseCase,
};
use crate::circle::{circles_router, CircleRepository, CirclesState};
use crate::domain::operations::{CreateDomainUseCase, DeleteDomainUseCase, UpdateDomainUseCase};
use crate::domain::{domains_router, DomainRepository, DomainsState};
use crate::identity::IdentityResolver;
use crate::invitation::operations::{
    AcceptInvitationUseCase, CancelInvitationUseCase, CreateInvitationUseCase,
    ResendInvitationUseCase,
};
use crate::invitation::{invitations_router, InvitationRepository, InvitationsState};
use crate::organization::operations::{
    CreateOrganizationUseCase, DeleteOrganizationUseCase, UpdateOrganizationUseCase,
};
use crate::organization::{
    my_organizations_router, organizations_router, OrganizationRepository, OrganizationsState,
};
use crate::partner::operations::{DeletePartnerUseCase, SetPartnerTypeUseCase, UpdatePartnerUseCase};
use crate::partner::{partners_router, PartnerRepository, PartnersState};
use crate::policy::operations::{CreatePolicyUseCase, DeletePolicyUseCase, UpdatePolicyUseCase};
use crate::policy::{policies_router, PoliciesState, PolicyRepository};
use crate::role::operations::{
    AddRoleMemberUseCase, AssignmentRepos, CollapseRoleUseCase, CreateRoleUseCase,
    DeleteRoleUseCase, ExpandRoleUseCase, RemoveRoleMemberUseCase, UpdateRoleUseCase,
};
use crate::role::{roles_router, RoleRepository, RolesState};
use crate::shared::middleware::{AuthLayer, AuthState};
use crate::user::operations::{DeleteUserUseCase, RegisterUserUseCase, UpdateUserUseCase};
use crate::user::{users_router, UserRepository, UsersState};
use crate::usecase::SqliteUnitOfWork;

/// Build the complete HTTP application.
pub fn build_app(
    pool: SqlitePool,
    resolver: Arc<dyn IdentityResolver>,
    http: &HttpConfig,
) -> Router {
    // Repositories
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let organization_repo = Arc::new(OrganizationRepository::new(pool.clone()));
    let partner_repo = Arc::new(PartnerRepository::new(pool.clone()));
    let invitation_repo = Arc::new(InvitationRepository::new(pool.clone()));
    let circle_repo = Arc::new(CircleRepository::new(pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(pool.clone()));
    let domain_repo = Arc::new(DomainRepository::new(pool.clone()));
    let policy_repo = Arc::new(PolicyRepository::new(pool.clone()));
    let accountability_repo = Arc::new(AccountabilityRepository::new(pool.clone()));

    let unit_of_work = Arc::new(SqliteUnitOfWork::new(pool));

    let users_state = UsersState {
        user_repo: user_repo.clone(),
        register_use_case: Arc::new(RegisterUserUseCase::new(user_repo.clone(), unit_of_work.clone())),
        update_use_case: Arc::new(UpdateUserUseCase::new(user_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeleteUserUseCase::new(user_repo.clone(), unit_of_work.clone())),
    };

    let organizations_state = OrganizationsState {
        organization_repo: organization_repo.clone(),
        user_repo: user_repo.clone(),
        circle_repo: circle_repo.clone(),
        partner_repo: partner_repo.clone(),
        invitation_repo: invitation_repo.clone(),
        create_use_case: Arc::new(CreateOrganizationUseCase::new(user_repo.clone(), unit_of_work.clone())),
        update_use_case: Arc::new(UpdateOrganizationUseCase::new(
            organization_repo.clone(),
            unit_of_work.clone(),
        )),
        delete_use_case: Arc::new(DeleteOrganizationUseCase::new(
            organization_repo.clone(),
            unit_of_work.clone(),
        )),
        create_invitation_use_case: Arc::new(CreateInvitationUseCase::new(
            organization_repo.clone(),
            unit_of_work.clone(),
        )),
    };

    let invitations_state = InvitationsState {
        invitation_repo: invitation_repo.clone(),
        user_repo: user_repo.clone(),
        partner_repo: partner_repo.clone(),
        accept_use_case: Arc::new(AcceptInvitationUseCase::new(
            invitation_repo.clone(),
            organization_repo.clone(),
            user_repo.clone(),
            partner_repo.clone(),
            unit_of_work.clone(),
        )),
        cancel_use_case: Arc::new(CancelInvitationUseCase::new(invitation_repo.clone(), unit_of_work.clone())),
        resend_use_case: Arc::new(ResendInvitationUseCase::new()),
    };

    let partners_state = PartnersState {
        partner_repo: partner_repo.clone(),
        circle_repo: circle_repo.clone(),
        role_repo: role_repo.clone(),
        update_use_case: Arc::new(UpdatePartnerUseCase::new(partner_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeletePartnerUseCase::new(partner_repo.clone(), unit_of_work.clone())),
        set_type_use_case: Arc::new(SetPartnerTypeUseCase::new(partner_repo.clone(), unit_of_work.clone())),
    };

    let circles_state = CirclesState {
        circle_repo: circle_repo.clone(),
        role_repo: role_repo.clone(),
        partner_repo: partner_repo.clone(),
        create_use_case: Arc::new(CreateCircleUseCase::new(circle_repo.clone(), unit_of_work.clone())),
        update_use_case: Arc::new(UpdateCircleUseCase::new(circle_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeleteCircleUseCase::new(circle_repo.clone(), unit_of_work.clone())),
        create_role_use_case: Arc::new(CreateRoleUseCase::new(circle_repo.clone(), unit_of_work.clone())),
        add_member_use_case: Arc::new(AddCircleMemberUseCase::new(
            circle_repo.clone(),
            partner_repo.clone(),
            unit_of_work.clone(),
        )),
        remove_member_use_case: Arc::new(RemoveCircleMemberUseCase::new(
            circle_repo.clone(),
            partner_repo.clone(),
            unit_of_work.clone(),
        )),
    };

    let assignment_repos = AssignmentRepos {
        role_repo: role_repo.clone(),
        circle_repo: circle_repo.clone(),
        partner_repo: partner_repo.clone(),
    };

    let roles_state = RolesState {
        role_repo: role_repo.clone(),
        circle_repo: circle_repo.clone(),
        partner_repo: partner_repo.clone(),
        domain_repo: domain_repo.clone(),
        accountability_repo: accountability_repo.clone(),
        update_use_case: Arc::new(UpdateRoleUseCase::new(role_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeleteRoleUseCase::new(role_repo.clone(), unit_of_work.clone())),
        add_member_use_case: Arc::new(AddRoleMemberUseCase::new(
            assignment_repos.clone(),
            unit_of_work.clone(),
        )),
        remove_member_use_case: Arc::new(RemoveRoleMemberUseCase::new(
            assignment_repos,
            unit_of_work.clone(),
        )),
        expand_use_case: Arc::new(ExpandRoleUseCase::new(
            role_repo.clone(),
            circle_repo.clone(),
            unit_of_work.clone(),
        )),
        collapse_use_case: Arc::new(CollapseRoleUseCase::new()),
        create_domain_use_case: Arc::new(CreateDomainUseCase::new(role_repo.clone(), unit_of_work.clone())),
        create_accountability_use_case: Arc::new(CreateAccountabilityUseCase::new(
            role_repo.clone(),
            unit_of_work.clone(),
        )),
    };

    let domains_state = DomainsState {
        domain_repo: domain_repo.clone(),
        policy_repo: policy_repo.clone(),
        update_use_case: Arc::new(UpdateDomainUseCase::new(domain_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeleteDomainUseCase::new(domain_repo.clone(), unit_of_work.clone())),
        create_policy_use_case: Arc::new(CreatePolicyUseCase::new(domain_repo.clone(), unit_of_work.clone())),
    };

    let policies_state = PoliciesState {
        policy_repo: policy_repo.clone(),
        update_use_case: Arc::new(UpdatePolicyUseCase::new(policy_repo.clone(), unit_of_work.clone())),
        delete_use_case: Arc::new(DeletePolicyUseCase::new(policy_repo.clone(), unit_of_work.clone())),
    };

    let accountabilities_state = AccountabilitiesState {
        accountability_repo: accountability_repo.clone(),
        update_use_case: Arc::new(UpdateAccountabilityUseCase::new(
            accountability_repo.clone(),
            unit_of_work.clone(),
        )),
        delete_use_case: Arc::new(DeleteAccountabilityUseCase::new(
            accountability_repo.clone(),
            unit_of_work.clone(),
        )),
    };

    // Build OpenAPI router with all documented routes
    let (router, mut openapi) = OpenApiRouter::new()
        .merge(users_router(users_state))
        .nest("/me/organizations", my_organizations_router(organizations_state.clone()))
        .nest("/organizations", organizations_router(organizations_state))
        .nest("/invitations", invitations_router(invitations_state))
        .nest("/partners", partners_router(partners_state))
        .nest("/circles", circles_router(circles_state))
        .nest("/roles", roles_router(roles_state))
        .nest("/domains", domains_router(domains_state))
        .nest("/policies", policies_router(policies_state))
        .nest("/accountabilities", accountabilities_router(accountabilities_state))
        .split_for_parts();

    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }

    openapi.info.title = "Holacracy Platform API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description =
        Some("Organizations, circles, roles, partners and invitations".to_string());

    Router::new()
        .merge(router)
        .route("/health", get(health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", openapi))
        .layer(AuthLayer::new(AuthState::new(resolver)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&http.cors_origins))
}

/// `*` (or no origins at all) allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
