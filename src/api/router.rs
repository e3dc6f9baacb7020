use axum::{middleware::from_fn, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::middleware::error_envelope;
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints (no auth required)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Token issuance for local clients
        .nest("/auth", auth::create_auth_router())
        // Team-scoped v1 API
        .nest("/v1", v1::create_v1_router())
        .with_state(state)
        // Stamps the request path into error envelopes
        .layer(from_fn(error_envelope))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::domain::membership::TeamRole;
    use crate::domain::storage::Storage;
    use crate::domain::{AuthenticatedUser, Review, RoleHint, Team, TeamId, UserId, Widget};
    use crate::infrastructure::auth::{JwtConfig, JwtVerifier, TokenIssuer};
    use crate::infrastructure::membership::{InMemoryMembershipRepository, MembershipService};
    use crate::infrastructure::review::ReviewService;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::team::{CreateTeamRequest, StorageTeamRepository, TeamService};
    use crate::infrastructure::widget::WidgetService;

    struct TestEnv {
        router: Router,
        jwt: Arc<JwtVerifier>,
        admin: AuthenticatedUser,
        member: AuthenticatedUser,
        outsider: AuthenticatedUser,
        team_one: TeamId,
        team_two: TeamId,
    }

    impl TestEnv {
        fn token_for(&self, user: &AuthenticatedUser) -> String {
            self.jwt.issue(user).unwrap()
        }
    }

    fn test_user(email: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(Uuid::new_v4()), email, RoleHint::Employee)
    }

    /// Two teams: admin runs team one with member as a plain member,
    /// outsider runs team two alone.
    async fn seeded_env() -> TestEnv {
        let team_storage: Arc<dyn Storage<Team>> = Arc::new(InMemoryStorage::new());
        let team_repo = Arc::new(StorageTeamRepository::new(team_storage));
        let memberships = Arc::new(InMemoryMembershipRepository::new());

        let team_service = Arc::new(TeamService::new(team_repo, memberships.clone()));
        let membership_service = Arc::new(MembershipService::new(memberships));

        let review_storage: Arc<dyn Storage<Review>> = Arc::new(InMemoryStorage::new());
        let widget_storage: Arc<dyn Storage<Widget>> = Arc::new(InMemoryStorage::new());
        let review_service = Arc::new(ReviewService::new(review_storage));
        let widget_service = Arc::new(WidgetService::new(widget_storage));

        let jwt = Arc::new(JwtVerifier::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            ttl_hours: 1,
        }));

        let admin = test_user("admin@example.com");
        let member = test_user("member@example.com");
        let outsider = test_user("outsider@example.com");

        let team_one = team_service
            .create(
                CreateTeamRequest {
                    name: "Alpha".to_string(),
                    description: None,
                },
                admin.id,
            )
            .await
            .unwrap();
        let team_two = team_service
            .create(
                CreateTeamRequest {
                    name: "Beta".to_string(),
                    description: None,
                },
                outsider.id,
            )
            .await
            .unwrap();

        membership_service
            .add_member(team_one.id(), member.id, TeamRole::Member)
            .await
            .unwrap();

        let state = AppState {
            verifier: jwt.clone(),
            issuer: jwt.clone(),
            team_service,
            membership_service,
            review_service,
            widget_service,
        };

        TestEnv {
            router: create_router_with_state(state),
            jwt,
            admin,
            member,
            outsider,
            team_one: team_one.id(),
            team_two: team_two.id(),
        }
    }

    async fn send(
        env: &TestEnv,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = env.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let env = seeded_env().await;

        let (status, body) = send(&env, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&env, Method::GET, "/live", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&env, Method::GET, "/ready", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_yields_auth_required_envelope() {
        let env = seeded_env().await;

        let (status, body) = send(&env, Method::GET, "/v1/teams", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_REQUIRED");
        assert_eq!(body["path"], "/v1/teams");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_garbage_token_yields_auth_invalid() {
        let env = seeded_env().await;

        let (status, body) =
            send(&env, Method::GET, "/v1/teams", Some("not-a-jwt"), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH_INVALID");
    }

    #[tokio::test]
    async fn test_malformed_json_body_stays_in_envelope() {
        let env = seeded_env().await;
        let token = env.token_for(&env.admin);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/teams")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = env.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["path"], "/v1/teams");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_issue_token_then_list_teams() {
        let env = seeded_env().await;

        let (status, body) = send(
            &env,
            Method::POST,
            "/auth/token",
            None,
            Some(json!({ "email": "fresh@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&env, Method::GET, "/v1/teams", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_list_teams_returns_memberships_with_role() {
        let env = seeded_env().await;
        let token = env.token_for(&env.admin);

        let (status, body) = send(&env, Method::GET, "/v1/teams", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["teams"][0]["name"], "Alpha");
        assert_eq!(body["teams"][0]["role"], "admin");
    }

    #[tokio::test]
    async fn test_create_team_makes_creator_admin() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let (status, body) = send(
            &env,
            Method::POST,
            "/v1/teams",
            Some(&token),
            Some(json!({ "name": "Gamma", "description": "Side project" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");

        let (_, body) = send(&env, Method::GET, "/v1/teams", Some(&token), None).await;
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_member_can_list_reviews_in_own_team_only() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let uri = format!("/v1/reviews?team_id={}", env.team_one);
        let (status, body) = send(&env, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        // Same caller against a real team they do not belong to.
        let uri = format!("/v1/reviews?team_id={}", env.team_two);
        let (status, body) = send(&env, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_MEMBERSHIP_REQUIRED");
    }

    #[tokio::test]
    async fn test_unknown_team_indistinguishable_from_forbidden() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let uri = format!("/v1/reviews?team_id={}", TeamId::generate());
        let (status, body) = send(&env, Method::GET, &uri, Some(&token), None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_MEMBERSHIP_REQUIRED");
    }

    #[tokio::test]
    async fn test_missing_team_id_is_validation_error() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let (status, body) = send(&env, Method::GET, "/v1/reviews", Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["param"], "team_id");
    }

    #[tokio::test]
    async fn test_malformed_team_id_is_validation_error() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let (status, body) = send(
            &env,
            Method::GET,
            "/v1/reviews?team_id=design-team",
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_member_creates_review_but_not_widget() {
        let env = seeded_env().await;
        let token = env.token_for(&env.member);

        let uri = format!("/v1/reviews?team_id={}", env.team_one);
        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "title": "Q3 retro", "body": "Went well", "rating": 4 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team_id"], env.team_one.to_string());
        assert_eq!(body["author_id"], env.member.id.to_string());

        // Widgets are structural; members cannot create them.
        let uri = format!("/v1/widgets?team_id={}", env.team_one);
        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "title": "Burndown", "kind": "chart", "position": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");
        assert_eq!(body["details"]["capability"], "resource:create_structural");
    }

    #[tokio::test]
    async fn test_admin_creates_widget_scoped_to_team() {
        let env = seeded_env().await;
        let token = env.token_for(&env.admin);

        let uri = format!("/v1/widgets?team_id={}", env.team_one);
        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({ "title": "Burndown", "kind": "chart", "position": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team_id"], env.team_one.to_string());
        assert_eq!(body["active"], true);
    }

    #[tokio::test]
    async fn test_member_content_update_allowed_structural_denied() {
        let env = seeded_env().await;
        let admin_token = env.token_for(&env.admin);
        let member_token = env.token_for(&env.member);

        let uri = format!("/v1/reviews?team_id={}", env.team_one);
        let (_, created) = send(
            &env,
            Method::POST,
            &uri,
            Some(&admin_token),
            Some(json!({ "title": "Launch", "body": "Draft", "rating": 3 })),
        )
        .await;
        let review_id = created["id"].as_str().unwrap();

        let uri = format!("/v1/reviews/{}?team_id={}", review_id, env.team_one);
        let (status, body) = send(
            &env,
            Method::PUT,
            &uri,
            Some(&member_token),
            Some(json!({ "body": "Final", "rating": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating"], 5);
        assert_eq!(body["title"], "Launch");

        let (status, body) = send(
            &env,
            Method::PUT,
            &uri,
            Some(&member_token),
            Some(json!({ "title": "Renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");
        assert_eq!(body["details"]["capability"], "resource:update_structural");
    }

    #[tokio::test]
    async fn test_review_invisible_across_teams() {
        let env = seeded_env().await;
        let admin_token = env.token_for(&env.admin);
        let outsider_token = env.token_for(&env.outsider);

        let uri = format!("/v1/reviews?team_id={}", env.team_one);
        let (_, created) = send(
            &env,
            Method::POST,
            &uri,
            Some(&admin_token),
            Some(json!({ "title": "Internal", "body": "Secret", "rating": 2 })),
        )
        .await;
        let review_id = created["id"].as_str().unwrap();

        // Outsider scopes the read to their own team; the row must not leak.
        let uri = format!("/v1/reviews/{}?team_id={}", review_id, env.team_two);
        let (status, body) = send(&env, Method::GET, &uri, Some(&outsider_token), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_member_cannot_add_members_admin_can() {
        let env = seeded_env().await;
        let member_token = env.token_for(&env.member);
        let admin_token = env.token_for(&env.admin);
        let newcomer = Uuid::new_v4().to_string();

        let uri = format!("/v1/teams/{}/members", env.team_one);
        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&member_token),
            Some(json!({ "user_id": newcomer, "role": "member" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_ADMIN_REQUIRED");

        // A non-member is indistinguishable from a team that does not exist.
        let outsider_token = env.token_for(&env.outsider);
        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&outsider_token),
            Some(json!({ "user_id": newcomer, "role": "member" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_MEMBERSHIP_REQUIRED");

        let (status, body) = send(
            &env,
            Method::POST,
            &uri,
            Some(&admin_token),
            Some(json!({ "user_id": newcomer, "role": "member" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "member");
    }

    #[tokio::test]
    async fn test_re_adding_member_updates_role_keeps_joined_at() {
        let env = seeded_env().await;
        let admin_token = env.token_for(&env.admin);

        let uri = format!("/v1/teams/{}/members", env.team_one);
        let (status, first) = send(
            &env,
            Method::POST,
            &uri,
            Some(&admin_token),
            Some(json!({ "user_id": env.member.id.to_string(), "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["role"], "admin");

        let (status, second) = send(
            &env,
            Method::POST,
            &uri,
            Some(&admin_token),
            Some(json!({ "user_id": env.member.id.to_string(), "role": "member" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["role"], "member");
        assert_eq!(second["joined_at"], first["joined_at"]);
    }

    #[tokio::test]
    async fn test_member_removes_self_but_not_others() {
        let env = seeded_env().await;
        let member_token = env.token_for(&env.member);

        let uri = format!(
            "/v1/teams/{}/members/{}",
            env.team_one, env.admin.id
        );
        let (status, body) = send(&env, Method::DELETE, &uri, Some(&member_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_ADMIN_REQUIRED");

        let uri = format!(
            "/v1/teams/{}/members/{}",
            env.team_one, env.member.id
        );
        let (status, body) = send(&env, Method::DELETE, &uri, Some(&member_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], true);

        // Gone means no further team access.
        let (status, _) =
            send(&env, Method::DELETE, &uri, Some(&member_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_last_admin_cannot_be_removed() {
        let env = seeded_env().await;
        let admin_token = env.token_for(&env.admin);

        let uri = format!(
            "/v1/teams/{}/members/{}",
            env.team_one, env.admin.id
        );
        let (status, body) = send(&env, Method::DELETE, &uri, Some(&admin_token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_outsider_cannot_list_members() {
        let env = seeded_env().await;
        let token = env.token_for(&env.outsider);

        let uri = format!("/v1/teams/{}/members", env.team_one);
        let (status, body) = send(&env, Method::GET, &uri, Some(&token), None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "TEAM_MEMBERSHIP_REQUIRED");
    }
}
