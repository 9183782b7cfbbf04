//! Platform API Integration Tests
//!
//! Drives the full router (auth layer, handlers, use cases, SQLite store)
//! with in-process requests.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{error_type, id_of, total, TestApp, ALICE, BOB, CAROL, EXPIRED};

// Authentication and error envelope
mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let app = TestApp::new().await;
        let (status, body) = app.request(Method::GET, "/me", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(error_type(&body), "AuthenticationError");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_bad_request() {
        let app = TestApp::new().await;
        let request = axum::http::Request::builder()
            .uri("/me")
            .header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expired_and_unknown_tokens_are_unauthorized() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/me", EXPIRED).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_type(&body), "AuthenticationError");

        let (status, _) = app.get("/me", "no-such-token").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_health_and_openapi_need_no_token() {
        let app = TestApp::new().await;

        let (status, body) = app.request(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("UP"));

        let (status, body) = app.request(Method::GET, "/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/organizations/{id}"].is_object());
        assert!(body["paths"]["/invitations/{id}/accept"].is_object());
    }
}

// /register and /me
mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_lifecycle() {
        let app = TestApp::new().await;

        let user = app.register(ALICE).await;
        assert_eq!(user["externalId"], json!("auth0|alice"));
        assert_eq!(user["firstName"], json!("Alice"));

        let (status, body) = app.request(Method::POST, "/register", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_type(&body), "EntityAlreadyExists");

        let (status, me) = app.get("/me", ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], user["id"]);

        let (status, updated) = app
            .put("/me", ALICE, Some(json!({ "firstName": "Alicia" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["firstName"], json!("Alicia"));
        assert_eq!(updated["lastName"], json!("Liddell"));

        let (status, body) = app.delete("/me", ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, body) = app.get("/me", ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_type(&body), "EntityNotFound");

        // Reactivation keeps the id and answers 200
        let (status, again) = app.request(Method::POST, "/me", Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["id"], user["id"]);
    }

    #[tokio::test]
    async fn test_unregistered_caller_gets_not_found() {
        let app = TestApp::new().await;

        let (status, _) = app.get("/me", BOB).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.post("/me/organizations", BOB, json!({ "name": "Acme" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleting_user_deletes_partners() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org = app.create_organization(ALICE, "Acme").await;
        let org_id = id_of(&org);

        let (_, admins) = app.get(&format!("/organizations/{}/admins", org_id), ALICE).await;
        let partner_id = id_of(&admins["items"][0]);

        let (status, _) = app.delete("/me", ALICE).await;
        assert_eq!(status, StatusCode::OK);

        app.register(BOB).await;
        let (status, _) = app.get(&format!("/partners/{}", partner_id), BOB).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

// Organization bootstrap, update and soft delete
mod organization_tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_creates_anchor_roles_and_admin() {
        let app = TestApp::new().await;
        app.register(ALICE).await;

        let org = app.create_organization(ALICE, "Acme").await;
        assert_eq!(org["name"], json!("Acme"));
        let org_id = id_of(&org);

        let (status, anchor) = app
            .get(&format!("/organizations/{}/anchor_circle", org_id), ALICE)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(anchor["organizationId"], json!(org_id));
        assert!(anchor["parentCircleId"].is_null());
        let anchor_id = id_of(&anchor);

        let (_, roles) = app.get(&format!("/circles/{}/roles", anchor_id), ALICE).await;
        assert_eq!(total(&roles), 3);
        let mut types: Vec<String> = roles["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["roleType"].as_str().unwrap().to_string())
            .collect();
        types.sort();
        assert_eq!(types, vec!["facilitator", "lead_link", "secretary"]);

        let (_, members) = app.get(&format!("/organizations/{}/members", org_id), ALICE).await;
        assert_eq!(total(&members), 1);
        let partner = &members["items"][0];
        assert_eq!(partner["partnerType"], json!("admin"));
        assert_eq!(partner["email"], json!("alice@example.com"));
        assert_eq!(partner["firstName"], json!("Alice"));
        let partner_id = id_of(partner);

        let (_, admins) = app.get(&format!("/organizations/{}/admins", org_id), ALICE).await;
        assert_eq!(total(&admins), 1);

        let (status, _) = app
            .get(&format!("/circles/{}/members/{}", anchor_id, partner_id), ALICE)
            .await;
        assert_eq!(status, StatusCode::OK);

        let lead_link = roles["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["roleType"] == json!("lead_link"))
            .unwrap();
        assert_eq!(lead_link["name"], json!("Lead Link"));
        let (_, lead_members) = app
            .get(&format!("/roles/{}/members", id_of(lead_link)), ALICE)
            .await;
        assert_eq!(total(&lead_members), 1);
        assert_eq!(lead_members["items"][0]["id"], json!(partner_id));

        let (_, mine) = app.get("/me/organizations", ALICE).await;
        assert_eq!(total(&mine), 1);
        assert_eq!(mine["items"][0]["id"], json!(org_id));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_side_effects() {
        let app = TestApp::new().await;
        app.register(ALICE).await;

        let (status, body) = app.post("/me/organizations", ALICE, json!({ "name": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_type(&body), "ValidationError");

        assert_eq!(app.count_rows("organizations").await, 0);
        assert_eq!(app.count_rows("circles").await, 0);
        assert_eq!(app.count_rows("partners").await, 0);
    }

    #[tokio::test]
    async fn test_update_organization() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);

        let (status, body) = app
            .put(&format!("/organizations/{}", org_id), ALICE, Some(json!({ "name": "Acme Co" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("Acme Co"));

        let (status, _) = app
            .put(&format!("/organizations/{}", org_id), ALICE, Some(json!({ "name": "" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_organization_cascades_to_partners() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let bob_partner = app.join(ALICE, &org_id, BOB, "bob@example.com").await;

        let (status, body) = app.delete(&format!("/organizations/{}", org_id), ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, _) = app.get(&format!("/organizations/{}", org_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.get(&format!("/partners/{}", id_of(&bob_partner)), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(
            app.count(
                "SELECT COUNT(*) FROM partners WHERE organization_id = ?1 AND is_deleted = 0",
                &org_id
            )
            .await,
            0
        );

        let (_, mine) = app.get("/me/organizations", BOB).await;
        assert_eq!(total(&mine), 0);

        let (status, _) = app.delete(&format!("/organizations/{}", org_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bootstrap_is_audited() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);

        assert_eq!(
            app.count(
                "SELECT COUNT(*) FROM events WHERE subject = ?1",
                &format!("holacracy.organization.{}", org_id)
            )
            .await,
            1
        );
        assert_eq!(
            app.count("SELECT COUNT(*) FROM audit_logs WHERE entity_id = ?1", &org_id).await,
            1
        );
    }
}

// Invitation state machine
mod invitation_tests {
    use super::*;

    async fn invite(app: &TestApp, org_id: &str, email: &str) -> serde_json::Value {
        let (status, invitation) = app
            .post(
                &format!("/organizations/{}/invitations", org_id),
                ALICE,
                json!({ "email": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", invitation);
        invitation
    }

    async fn setup() -> (TestApp, String) {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        app.register(CAROL).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        (app, org_id)
    }

    #[tokio::test]
    async fn test_create_invitation() {
        let (app, org_id) = setup().await;

        let invitation = invite(&app, &org_id, "bob@example.com").await;
        assert_eq!(invitation["status"], json!("pending"));
        let code = invitation["code"].as_str().unwrap();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        let (status, body) = app
            .post(
                &format!("/organizations/{}/invitations", org_id),
                ALICE,
                json!({ "email": "not-an-email" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_type(&body), "ValidationError");

        let (status, list) = app
            .get(&format!("/organizations/{}/invitations", org_id), ALICE)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(total(&list), 1);

        let (status, _) = app
            .post("/organizations/unknown/invitations", ALICE, json!({ "email": "x@example.com" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_accept_creates_member_partner() {
        let (app, org_id) = setup().await;
        let invitation = invite(&app, &org_id, "bob@example.com").await;
        let code = invitation["code"].as_str().unwrap();

        let (status, partner) = app.get(&format!("/invitations/{}/accept", code), BOB).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(partner["partnerType"], json!("member"));
        assert_eq!(partner["organizationId"], json!(org_id));
        assert_eq!(partner["invitationId"], invitation["id"]);
        assert_eq!(partner["email"], json!("bob@example.com"));

        let (_, read) = app.get(&format!("/invitations/{}", id_of(&invitation)), ALICE).await;
        assert_eq!(read["status"], json!("accepted"));

        // Same caller again: no-op, same partner
        let (status, again) = app.get(&format!("/invitations/{}/accept", code), BOB).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["id"], partner["id"]);

        // Someone else: conflict
        let (status, body) = app.get(&format!("/invitations/{}/accept", code), CAROL).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_type(&body), "EntityNotModified");

        assert_eq!(
            app.count("SELECT COUNT(*) FROM partners WHERE organization_id = ?1", &org_id).await,
            2
        );

        let (status, _) = app.delete(&format!("/invitations/{}", id_of(&invitation)), ALICE).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_existing_partner_cannot_accept() {
        let (app, org_id) = setup().await;
        let invitation = invite(&app, &org_id, "alice@example.com").await;

        let (status, body) = app
            .get(&format!("/invitations/{}/accept", invitation["code"].as_str().unwrap()), ALICE)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_type(&body), "EntityAlreadyExists");

        let (_, read) = app.get(&format!("/invitations/{}", id_of(&invitation)), ALICE).await;
        assert_eq!(read["status"], json!("pending"));
    }

    #[tokio::test]
    async fn test_soft_deleted_partner_is_revived() {
        let (app, org_id) = setup().await;
        let first = app.join(ALICE, &org_id, BOB, "bob@example.com").await;

        let (status, _) = app.delete(&format!("/partners/{}", id_of(&first)), ALICE).await;
        assert_eq!(status, StatusCode::OK);

        let second = app.join(ALICE, &org_id, BOB, "bob@example.com").await;
        assert_eq!(second["id"], first["id"]);
        assert_eq!(second["partnerType"], json!("member"));
    }

    #[tokio::test]
    async fn test_cancel() {
        let (app, org_id) = setup().await;
        let invitation = invite(&app, &org_id, "carol@example.com").await;
        let uri = format!("/invitations/{}", id_of(&invitation));

        let (status, body) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        // Repeating a cancel is a no-op
        let (status, _) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .get(&format!("/invitations/{}/accept", invitation["code"].as_str().unwrap()), CAROL)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app.delete("/invitations/unknown", ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resend_is_not_implemented() {
        let (app, org_id) = setup().await;
        let invitation = invite(&app, &org_id, "carol@example.com").await;

        let (status, body) = app
            .put(&format!("/invitations/{}", id_of(&invitation)), ALICE, None)
            .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(error_type(&body), "MethodNotImplemented");
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let (app, _) = setup().await;
        let (status, body) = app.get("/invitations/nope/accept", BOB).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_type(&body), "EntityNotFound");
    }
}

// Partners and admin privileges
mod partner_tests {
    use super::*;

    #[tokio::test]
    async fn test_grant_and_revoke_admin() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let bob = app.join(ALICE, &org_id, BOB, "bob@example.com").await;
        let uri = format!("/partners/{}/admin", id_of(&bob));

        let (status, promoted) = app.put(&uri, ALICE, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(promoted["partnerType"], json!("admin"));

        let (status, _) = app.put(&uri, ALICE, None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, admins) = app.get(&format!("/organizations/{}/admins", org_id), ALICE).await;
        assert_eq!(total(&admins), 2);

        let (status, demoted) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(demoted["partnerType"], json!("member"));

        let (status, _) = app.put("/partners/unknown/admin", ALICE, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_partner() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let bob = app.join(ALICE, &org_id, BOB, "bob@example.com").await;
        let uri = format!("/partners/{}", id_of(&bob));

        let (status, updated) = app
            .put(&uri, ALICE, Some(json!({ "firstName": "Robert", "isActive": false })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["firstName"], json!("Robert"));
        assert_eq!(updated["isActive"], json!(false));

        let (status, _) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.get(&uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, members) = app.get(&format!("/organizations/{}/members", org_id), ALICE).await;
        assert_eq!(total(&members), 1);
    }
}

// Circles and memberships
mod circle_tests {
    use super::*;

    #[tokio::test]
    async fn test_child_circles_and_membership() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let anchor_id = app.anchor_circle_id(ALICE, &org_id).await;
        let bob_id = id_of(&app.join(ALICE, &org_id, BOB, "bob@example.com").await);

        let (status, child) = app
            .post(
                &format!("/circles/{}/circles", anchor_id),
                ALICE,
                json!({ "name": "Engineering", "purpose": "Build things" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(child["parentCircleId"], json!(anchor_id));
        assert_eq!(child["organizationId"], json!(org_id));
        let child_id = id_of(&child);

        let (_, children) = app.get(&format!("/circles/{}/circles", anchor_id), ALICE).await;
        assert_eq!(total(&children), 1);

        let member_uri = format!("/circles/{}/members/{}", child_id, bob_id);
        let (status, _) = app.get(&member_uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Idempotent add
        for _ in 0..2 {
            let (status, partner) = app.put(&member_uri, ALICE, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(partner["id"], json!(bob_id));
        }
        let (_, members) = app.get(&format!("/circles/{}/members", child_id), ALICE).await;
        assert_eq!(total(&members), 1);

        let (_, bob_circles) = app.get(&format!("/partners/{}/circles", bob_id), ALICE).await;
        assert_eq!(total(&bob_circles), 1);

        let (status, _) = app.delete(&member_uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = app.delete(&member_uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_type(&body), "EntityNotFound");

        let (status, _) = app.delete(&format!("/circles/{}", child_id), ALICE).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.get(&format!("/circles/{}", child_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, children) = app.get(&format!("/circles/{}/circles", anchor_id), ALICE).await;
        assert_eq!(total(&children), 0);
    }

    #[tokio::test]
    async fn test_anchor_circle_cannot_be_deleted() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let anchor_id = app.anchor_circle_id(ALICE, &org_id).await;

        let (status, _) = app.delete(&format!("/circles/{}", anchor_id), ALICE).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_membership_across_organizations_is_rejected() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        app.register(BOB).await;
        let acme = id_of(&app.create_organization(ALICE, "Acme").await);
        let globex = id_of(&app.create_organization(BOB, "Globex").await);
        let acme_anchor = app.anchor_circle_id(ALICE, &acme).await;

        let (_, globex_admins) = app.get(&format!("/organizations/{}/admins", globex), BOB).await;
        let bob_partner = id_of(&globex_admins["items"][0]);

        let (status, _) = app
            .put(&format!("/circles/{}/members/{}", acme_anchor, bob_partner), ALICE, None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_circle_and_blank_child_name() {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let anchor_id = app.anchor_circle_id(ALICE, &org_id).await;

        let (status, updated) = app
            .put(&format!("/circles/{}", anchor_id), ALICE, Some(json!({ "purpose": "Run Acme" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["purpose"], json!("Run Acme"));

        let (status, _) = app
            .post(&format!("/circles/{}/circles", anchor_id), ALICE, json!({ "name": "" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .post("/circles/unknown/circles", ALICE, json!({ "name": "Ops" }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, circles) = app.get(&format!("/organizations/{}/circles", org_id), ALICE).await;
        assert_eq!(total(&circles), 1);
    }
}

// Roles, assignments, domains, policies, accountabilities
mod role_tests {
    use super::*;

    async fn setup() -> (TestApp, String, String) {
        let app = TestApp::new().await;
        app.register(ALICE).await;
        let org_id = id_of(&app.create_organization(ALICE, "Acme").await);
        let anchor_id = app.anchor_circle_id(ALICE, &org_id).await;
        (app, org_id, anchor_id)
    }

    async fn create_role(app: &TestApp, circle_id: &str, name: &str) -> serde_json::Value {
        let (status, role) = app
            .post(&format!("/circles/{}/roles", circle_id), ALICE, json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", role);
        role
    }

    #[tokio::test]
    async fn test_create_update_role() {
        let (app, _, anchor_id) = setup().await;

        let role = create_role(&app, &anchor_id, "Marketing").await;
        assert_eq!(role["roleType"], json!("custom"));
        assert_eq!(role["parentCircleId"], json!(anchor_id));

        let (status, _) = app
            .post(
                &format!("/circles/{}/roles", anchor_id),
                ALICE,
                json!({ "name": "Second Lead", "roleType": "lead_link" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, updated) = app
            .put(
                &format!("/roles/{}", id_of(&role)),
                ALICE,
                Some(json!({ "purpose": "Tell the world" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["purpose"], json!("Tell the world"));
        assert_eq!(updated["name"], json!("Marketing"));

        let (_, roles) = app.get(&format!("/circles/{}/roles", anchor_id), ALICE).await;
        assert_eq!(total(&roles), 4);
    }

    #[tokio::test]
    async fn test_core_roles_cannot_be_deleted() {
        let (app, _, anchor_id) = setup().await;
        let (_, roles) = app.get(&format!("/circles/{}/roles", anchor_id), ALICE).await;

        for role in roles["items"].as_array().unwrap() {
            let (status, _) = app.delete(&format!("/roles/{}", id_of(role)), ALICE).await;
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }

    #[tokio::test]
    async fn test_assignment_is_idempotent() {
        let (app, org_id, anchor_id) = setup().await;
        let role_id = id_of(&create_role(&app, &anchor_id, "Marketing").await);
        let (_, admins) = app.get(&format!("/organizations/{}/admins", org_id), ALICE).await;
        let partner_id = id_of(&admins["items"][0]);
        let uri = format!("/roles/{}/members/{}", role_id, partner_id);

        for _ in 0..2 {
            let (status, _) = app.put(&uri, ALICE, None).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, members) = app.get(&format!("/roles/{}/members", role_id), ALICE).await;
        assert_eq!(total(&members), 1);

        let (status, _) = app.get(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);

        // lead link plus the new role
        let (_, partner_roles) = app.get(&format!("/partners/{}/roles", partner_id), ALICE).await;
        assert_eq!(total(&partner_roles), 2);

        let (status, _) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_domain_policy_accountability_crud() {
        let (app, _, anchor_id) = setup().await;
        let role_id = id_of(&create_role(&app, &anchor_id, "Marketing").await);

        let (status, domain) = app
            .post(&format!("/roles/{}/domains", role_id), ALICE, json!({ "title": "Brand" }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(domain["roleId"], json!(role_id));
        let domain_id = id_of(&domain);

        let (status, renamed) = app
            .put(&format!("/domains/{}", domain_id), ALICE, Some(json!({ "title": "Brand assets" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["title"], json!("Brand assets"));

        let (status, policy) = app
            .post(
                &format!("/domains/{}/policies", domain_id),
                ALICE,
                json!({ "title": "Logo usage", "description": "Ask first" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let policy_id = id_of(&policy);

        let (status, updated) = app
            .put(&format!("/policies/{}", policy_id), ALICE, Some(json!({ "description": "Ask Marketing" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], json!("Logo usage"));
        assert_eq!(updated["description"], json!("Ask Marketing"));

        let (status, accountability) = app
            .post(
                &format!("/roles/{}/accountabilities", role_id),
                ALICE,
                json!({ "title": "Publishing the newsletter" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let accountability_id = id_of(&accountability);

        let (_, list) = app.get(&format!("/roles/{}/accountabilities", role_id), ALICE).await;
        assert_eq!(total(&list), 1);

        let (status, _) = app
            .post(&format!("/roles/{}/domains", role_id), ALICE, json!({ "title": " " }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Domain delete takes its policies
        let (status, _) = app.delete(&format!("/domains/{}", domain_id), ALICE).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.get(&format!("/policies/{}", policy_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.delete(&format!("/accountabilities/{}", accountability_id), ALICE).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.get(&format!("/accountabilities/{}", accountability_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_role_delete_cascades() {
        let (app, org_id, anchor_id) = setup().await;
        let role_id = id_of(&create_role(&app, &anchor_id, "Marketing").await);
        let (_, admins) = app.get(&format!("/organizations/{}/admins", org_id), ALICE).await;
        let partner_id = id_of(&admins["items"][0]);

        let (_, domain) = app
            .post(&format!("/roles/{}/domains", role_id), ALICE, json!({ "title": "Brand" }))
            .await;
        let (_, policy) = app
            .post(&format!("/domains/{}/policies", id_of(&domain)), ALICE, json!({ "title": "Logo" }))
            .await;
        let (_, accountability) = app
            .post(&format!("/roles/{}/accountabilities", role_id), ALICE, json!({ "title": "Posting" }))
            .await;
        app.put(&format!("/roles/{}/members/{}", role_id, partner_id), ALICE, None).await;

        let (status, _) = app.delete(&format!("/roles/{}", role_id), ALICE).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.get(&format!("/roles/{}", role_id), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&format!("/domains/{}", id_of(&domain)), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&format!("/policies/{}", id_of(&policy)), ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app
            .get(&format!("/accountabilities/{}", id_of(&accountability)), ALICE)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            app.count("SELECT COUNT(*) FROM role_partners WHERE role_id = ?1", &role_id).await,
            0
        );
    }

    #[tokio::test]
    async fn test_expand_role_into_circle() {
        let (app, _, anchor_id) = setup().await;
        let role = create_role(&app, &anchor_id, "Product").await;
        let role_id = id_of(&role);
        let uri = format!("/roles/{}/circle", role_id);

        let (status, _) = app.get(&uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, circle) = app.request(Method::POST, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(circle["name"], json!("Product"));
        assert_eq!(circle["parentCircleId"], json!(anchor_id));

        let (_, expanded) = app.get(&format!("/roles/{}", role_id), ALICE).await;
        assert_eq!(expanded["roleType"], json!("circle"));
        assert_eq!(expanded["circleId"], circle["id"]);

        let (status, read) = app.get(&uri, ALICE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(read["id"], circle["id"]);

        let (status, _) = app.request(Method::POST, &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = app.delete(&uri, ALICE).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(error_type(&body), "MethodNotImplemented");
    }
}
