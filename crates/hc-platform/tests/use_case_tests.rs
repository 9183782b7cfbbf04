//! Use case tests against the SQLite unit of work.

use std::sync::Arc;

use sqlx::SqlitePool;

use chrono::Utc;

use hc_platform::identity::ExternalIdentity;
use hc_platform::invitation::operations::{
    AcceptInvitationCommand, AcceptInvitationUseCase, CancelInvitationCommand,
    CancelInvitationUseCase, CreateInvitationCommand, CreateInvitationUseCase, InvitationAccepted,
};
use hc_platform::organization::operations::{
    CreateOrganizationCommand, CreateOrganizationUseCase, DeleteOrganizationCommand,
    DeleteOrganizationUseCase, OrganizationUpdated, UpdateOrganizationCommand,
};
use hc_platform::partner::operations::{PartnerUpdated, UpdatePartnerCommand, UpdatePartnerUseCase};
use hc_platform::role::operations::{
    CollapseRoleCommand, CollapseRoleUseCase, ExpandRoleCommand, ExpandRoleUseCase,
};
use hc_platform::shared::database;
use hc_platform::usecase::Change;
use hc_platform::user::operations::{RegisterUserCommand, RegisterUserUseCase};
use hc_platform::{
    AuditLogRepository, CircleRepository, ExecutionContext, InvitationRepository,
    InvitationStatus, OrganizationRepository, Partner, PartnerRepository, PartnerType,
    RoleRepository, RoleType, SqliteUnitOfWork, UnitOfWork, UseCaseError, UserRepository,
};

struct Fixture {
    pool: SqlitePool,
    uow: Arc<SqliteUnitOfWork>,
    users: Arc<UserRepository>,
    organizations: Arc<OrganizationRepository>,
    partners: Arc<PartnerRepository>,
    invitations: Arc<InvitationRepository>,
}

impl Fixture {
    async fn new() -> Self {
        let pool = database::connect_in_memory().await.unwrap();
        Self {
            uow: Arc::new(SqliteUnitOfWork::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            organizations: Arc::new(OrganizationRepository::new(pool.clone())),
            partners: Arc::new(PartnerRepository::new(pool.clone())),
            invitations: Arc::new(InvitationRepository::new(pool.clone())),
            pool,
        }
    }

    async fn register(&self, external_id: &str, email: &str) -> String {
        let use_case = RegisterUserUseCase::new(self.users.clone(), self.uow.clone());
        let command = RegisterUserCommand {
            identity: ExternalIdentity::new(external_id, email).with_name("Test", "User"),
        };
        let registration = use_case
            .execute(command, ExecutionContext::create(external_id))
            .await
            .into_result()
            .unwrap();
        registration.user_id().to_string()
    }

    async fn create_organization(&self, user_id: &str, name: &str) -> String {
        let use_case = CreateOrganizationUseCase::new(self.users.clone(), self.uow.clone());
        let command = CreateOrganizationCommand {
            user_id: user_id.to_string(),
            name: name.to_string(),
        };
        use_case
            .execute(command, ExecutionContext::create(user_id))
            .await
            .into_result()
            .unwrap()
            .organization_id
    }

    async fn invite(&self, organization_id: &str, email: &str) -> (String, String) {
        let use_case = CreateInvitationUseCase::new(self.organizations.clone(), self.uow.clone());
        let command = CreateInvitationCommand {
            organization_id: organization_id.to_string(),
            email: email.to_string(),
        };
        let event = use_case
            .execute(command, ExecutionContext::create("admin"))
            .await
            .into_result()
            .unwrap();
        let invitation = self
            .invitations
            .find_by_id(&event.invitation_id)
            .await
            .unwrap()
            .unwrap();
        (invitation.id, invitation.code)
    }

    fn accept(&self, code: &str, user_id: &str) -> AcceptInvitationCommand {
        AcceptInvitationCommand {
            code: code.to_string(),
            user_id: user_id.to_string(),
        }
    }

    async fn partner_count(&self, organization_id: &str) -> usize {
        self.partners.find_by_organization(organization_id).await.unwrap().len()
    }

    async fn admin_partner(&self, organization_id: &str) -> Partner {
        self.partners
            .find_admins(organization_id)
            .await
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    fn accept_use_case(&self) -> AcceptInvitationUseCase<SqliteUnitOfWork> {
        AcceptInvitationUseCase::new(
            self.invitations.clone(),
            self.organizations.clone(),
            self.users.clone(),
            self.partners.clone(),
            self.uow.clone(),
        )
    }
}

#[tokio::test]
async fn test_bootstrap_writes_every_row_in_one_commit() {
    let fixture = Fixture::new().await;
    let user_id = fixture.register("auth0|alice", "alice@example.com").await;

    let use_case = CreateOrganizationUseCase::new(fixture.users.clone(), fixture.uow.clone());
    let event = use_case
        .execute(
            CreateOrganizationCommand {
                user_id: user_id.clone(),
                name: "Acme".to_string(),
            },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();

    let circles = CircleRepository::new(fixture.pool.clone());
    let anchor = circles.find_anchor(&event.organization_id).await.unwrap().unwrap();
    assert_eq!(anchor.id, event.anchor_circle_id);

    let roles = RoleRepository::new(fixture.pool.clone());
    let core = roles.find_by_circle(&anchor.id).await.unwrap();
    assert_eq!(core.len(), 3);
    assert_eq!(event.role_ids.len(), 3);
    for role_type in RoleType::CORE {
        assert!(core.iter().any(|r| r.role_type == role_type));
    }

    let partner = fixture.partners.find_active(&event.admin_partner_id).await.unwrap().unwrap();
    assert_eq!(partner.partner_type, PartnerType::Admin);
    assert_eq!(partner.user_id, user_id);
    assert!(circles.is_member(&anchor.id, &partner.id).await.unwrap());

    let lead_link = core.iter().find(|r| r.role_type == RoleType::LeadLink).unwrap();
    assert!(roles.is_assigned(&lead_link.id, &partner.id).await.unwrap());

    let audit = AuditLogRepository::new(fixture.pool.clone());
    let logs = audit
        .find_by_entity("Organization", &event.organization_id, 10)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].operation, "CreateOrganizationCommand");
    assert_eq!(logs[0].principal_id.as_deref(), Some("auth0|alice"));

    let events = audit
        .find_events_by_subject(&format!("holacracy.organization.{}", event.organization_id))
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "holacracy:governance:organization:created");
}

#[tokio::test]
async fn test_failed_bootstrap_leaves_no_rows() {
    let fixture = Fixture::new().await;

    let use_case = CreateOrganizationUseCase::new(fixture.users.clone(), fixture.uow.clone());
    let result = use_case
        .execute(
            CreateOrganizationCommand {
                user_id: "missing-user".to_string(),
                name: "Ghost".to_string(),
            },
            ExecutionContext::create("nobody"),
        )
        .await;

    assert!(matches!(result.error(), Some(UseCaseError::NotFoundError { .. })));
    let organizations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
        .fetch_one(&fixture.pool)
        .await
        .unwrap();
    assert_eq!(organizations, 0);
}

#[tokio::test]
async fn test_repeated_accept_is_flagged_and_creates_no_partner() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let bob = fixture.register("auth0|bob", "bob@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let (invitation_id, code) = fixture.invite(&org_id, "bob@example.com").await;

    let accept = fixture.accept_use_case();
    let first = accept
        .execute(
            AcceptInvitationCommand { code: code.clone(), user_id: bob.clone() },
            ExecutionContext::create("auth0|bob"),
        )
        .await
        .into_result()
        .unwrap();
    assert!(!first.repeated);

    let second = accept
        .execute(
            AcceptInvitationCommand { code, user_id: bob.clone() },
            ExecutionContext::create("auth0|bob"),
        )
        .await
        .into_result()
        .unwrap();
    assert!(second.repeated);
    assert_eq!(second.partner_id, first.partner_id);

    let partners = fixture.partners.find_by_organization(&org_id).await.unwrap();
    assert_eq!(partners.len(), 2);

    let invitation = fixture.invitations.find_by_id(&invitation_id).await.unwrap().unwrap();
    assert_eq!(invitation.status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_cancel_then_accept_is_rejected() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let bob = fixture.register("auth0|bob", "bob@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let (invitation_id, code) = fixture.invite(&org_id, "bob@example.com").await;

    let cancel = CancelInvitationUseCase::new(fixture.invitations.clone(), fixture.uow.clone());
    let cancelled = cancel
        .execute(
            CancelInvitationCommand { invitation_id: invitation_id.clone() },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();
    assert!(!cancelled.repeated);

    let again = cancel
        .execute(
            CancelInvitationCommand { invitation_id },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();
    assert!(again.repeated);

    let result = fixture
        .accept_use_case()
        .execute(
            AcceptInvitationCommand { code, user_id: bob },
            ExecutionContext::create("auth0|bob"),
        )
        .await;
    assert!(matches!(result.error(), Some(UseCaseError::BusinessRuleViolation { .. })));
}

#[tokio::test]
async fn test_collapse_is_not_implemented() {
    let result = CollapseRoleUseCase::new()
        .execute(
            CollapseRoleCommand { role_id: "R1".to_string() },
            ExecutionContext::create("auth0|alice"),
        )
        .await;
    assert!(matches!(result.error(), Some(UseCaseError::NotImplemented { .. })));
}

fn is_business_rule(error: Option<&UseCaseError>) -> bool {
    matches!(error, Some(UseCaseError::BusinessRuleViolation { .. }))
}

#[tokio::test]
async fn test_stale_accept_after_cancel_rolls_back_partner() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let bob = fixture.register("auth0|bob", "bob@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let (invitation_id, code) = fixture.invite(&org_id, "bob@example.com").await;

    // Read while pending, then cancelled underneath
    let mut stale = fixture.invitations.find_by_id(&invitation_id).await.unwrap().unwrap();
    CancelInvitationUseCase::new(fixture.invitations.clone(), fixture.uow.clone())
        .execute(
            CancelInvitationCommand { invitation_id: invitation_id.clone() },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();

    let user = fixture.users.find_by_id(&bob).await.unwrap().unwrap();
    let partner = Partner::for_user(&user, &org_id, PartnerType::Member).with_invitation(&invitation_id);
    let partner_id = partner.id.clone();
    stale.transition(InvitationStatus::Accepted);
    let ctx = ExecutionContext::create("auth0|bob");
    let event = InvitationAccepted::new(&ctx, &invitation_id, &org_id, &partner_id, &bob, false);

    let result = fixture
        .uow
        .commit_all(
            vec![Change::save(stale), Change::save(partner)],
            event,
            &fixture.accept(&code, &bob),
        )
        .await;

    match result.error() {
        Some(UseCaseError::BusinessRuleViolation { code, .. }) => {
            assert_eq!(code, "INVITATION_NOT_PENDING")
        }
        other => panic!("expected business rule violation, got {:?}", other),
    }
    assert!(fixture.partners.find_by_id(&partner_id).await.unwrap().is_none());
    let invitation = fixture.invitations.find_by_id(&invitation_id).await.unwrap().unwrap();
    assert_eq!(invitation.status, InvitationStatus::Cancelled);
}

#[tokio::test]
async fn test_concurrent_accepts_admit_one_partner() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let bob = fixture.register("auth0|bob", "bob@example.com").await;
    let carol = fixture.register("auth0|carol", "carol@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let (invitation_id, code) = fixture.invite(&org_id, "team@example.com").await;

    let accept = fixture.accept_use_case();
    let (by_bob, by_carol) = tokio::join!(
        accept.execute(fixture.accept(&code, &bob), ExecutionContext::create("auth0|bob")),
        accept.execute(fixture.accept(&code, &carol), ExecutionContext::create("auth0|carol")),
    );

    assert!(by_bob.is_success() != by_carol.is_success());
    let loser = if by_bob.is_success() { &by_carol } else { &by_bob };
    assert!(is_business_rule(loser.error()));

    assert_eq!(fixture.partner_count(&org_id).await, 2);
    let invitation = fixture.invitations.find_by_id(&invitation_id).await.unwrap().unwrap();
    assert_eq!(invitation.status, InvitationStatus::Accepted);
}

#[tokio::test]
async fn test_concurrent_accept_and_cancel_have_one_winner() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let dave = fixture.register("auth0|dave", "dave@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let (invitation_id, code) = fixture.invite(&org_id, "dave@example.com").await;

    let accept = fixture.accept_use_case();
    let cancel = CancelInvitationUseCase::new(fixture.invitations.clone(), fixture.uow.clone());
    let (accepted, cancelled) = tokio::join!(
        accept.execute(fixture.accept(&code, &dave), ExecutionContext::create("auth0|dave")),
        cancel.execute(
            CancelInvitationCommand { invitation_id: invitation_id.clone() },
            ExecutionContext::create("auth0|alice"),
        ),
    );

    assert!(accepted.is_success() != cancelled.is_success());
    let invitation = fixture.invitations.find_by_id(&invitation_id).await.unwrap().unwrap();
    if accepted.is_success() {
        assert!(is_business_rule(cancelled.error()));
        assert_eq!(invitation.status, InvitationStatus::Accepted);
        assert_eq!(fixture.partner_count(&org_id).await, 2);
    } else {
        assert!(is_business_rule(accepted.error()));
        assert_eq!(invitation.status, InvitationStatus::Cancelled);
        assert_eq!(fixture.partner_count(&org_id).await, 1);
    }
}

#[tokio::test]
async fn test_stale_partner_update_cannot_undo_cascade() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let mut stale = fixture.admin_partner(&org_id).await;

    DeleteOrganizationUseCase::new(fixture.organizations.clone(), fixture.uow.clone())
        .execute(
            DeleteOrganizationCommand { organization_id: org_id.clone() },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();

    stale.first_name = Some("Stale".to_string());
    stale.updated_at = Utc::now();
    let ctx = ExecutionContext::create("auth0|alice");
    let command = UpdatePartnerCommand {
        partner_id: stale.id.clone(),
        first_name: Some("Stale".to_string()),
        last_name: None,
        email: None,
        is_active: None,
    };
    let event = PartnerUpdated::new(&ctx, &stale.id, true);
    let result = fixture.uow.commit(&stale, event, &command).await;

    assert!(matches!(result.error(), Some(UseCaseError::NotFoundError { .. })));
    let partner = fixture.partners.find_by_id(&stale.id).await.unwrap().unwrap();
    assert!(partner.is_deleted);
    assert_ne!(partner.first_name.as_deref(), Some("Stale"));
}

#[tokio::test]
async fn test_stale_organization_update_cannot_undelete() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let mut stale = fixture.organizations.find_active(&org_id).await.unwrap().unwrap();

    DeleteOrganizationUseCase::new(fixture.organizations.clone(), fixture.uow.clone())
        .execute(
            DeleteOrganizationCommand { organization_id: org_id.clone() },
            ExecutionContext::create("auth0|alice"),
        )
        .await
        .into_result()
        .unwrap();

    stale.name = "Acme Reborn".to_string();
    let ctx = ExecutionContext::create("auth0|alice");
    let command = UpdateOrganizationCommand {
        organization_id: org_id.clone(),
        name: "Acme Reborn".to_string(),
    };
    let event = OrganizationUpdated::new(&ctx, &org_id, &stale.name);
    let result = fixture.uow.commit(&stale, event, &command).await;

    assert!(matches!(result.error(), Some(UseCaseError::NotFoundError { .. })));
    assert!(fixture.organizations.find_active(&org_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_partner_update_racing_organization_delete_leaves_partner_deleted() {
    let fixture = Fixture::new().await;
    let alice = fixture.register("auth0|alice", "alice@example.com").await;
    let org_id = fixture.create_organization(&alice, "Acme").await;
    let admin = fixture.admin_partner(&org_id).await;

    let update = UpdatePartnerUseCase::new(fixture.partners.clone(), fixture.uow.clone());
    let delete = DeleteOrganizationUseCase::new(fixture.organizations.clone(), fixture.uow.clone());
    let (deleted, updated) = tokio::join!(
        delete.execute(
            DeleteOrganizationCommand { organization_id: org_id.clone() },
            ExecutionContext::create("auth0|alice"),
        ),
        update.execute(
            UpdatePartnerCommand {
                partner_id: admin.id.clone(),
                first_name: Some("Renamed".to_string()),
                last_name: None,
                email: None,
                is_active: Some(false),
            },
            ExecutionContext::create("auth0|alice"),
        ),
    );

    assert!(deleted.is_success());
    assert!(
        updated.is_success() || matches!(updated.error(), Some(UseCaseError::NotFoundError { .. })),
        "unexpected update outcome: {:?}",
        updated.error()
    );
    let partner = fixture.partners.find_by_id(&admin.id).await.unwrap().unwrap();
    assert!(partner.is_deleted);
    assert!(fixture.partners.find_by_user(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expand_role_without_parent_circle() {
    let fixture = Fixture::new().await;
    sqlx::query(
        "INSERT INTO roles (id, name, role_type, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind("ORPHAN")
    .bind("Gardener")
    .bind(RoleType::Custom)
    .bind(Utc::now())
    .bind(Utc::now())
    .execute(&fixture.pool)
    .await
    .unwrap();

    let roles = Arc::new(RoleRepository::new(fixture.pool.clone()));
    let circles = Arc::new(CircleRepository::new(fixture.pool.clone()));
    let result = ExpandRoleUseCase::new(roles.clone(), circles, fixture.uow.clone())
        .execute(
            ExpandRoleCommand { role_id: "ORPHAN".to_string() },
            ExecutionContext::create("auth0|alice"),
        )
        .await;

    match result.error() {
        Some(UseCaseError::NotFoundError { code, .. }) => assert_eq!(code, "CIRCLE_NOT_FOUND"),
        other => panic!("expected missing circle, got {:?}", other),
    }
    let role = roles.find_by_id("ORPHAN").await.unwrap().unwrap();
    assert_eq!(role.role_type, RoleType::Custom);
}
