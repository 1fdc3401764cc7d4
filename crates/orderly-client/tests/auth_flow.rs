//! AuthService Integration Tests
//!
//! Tests for:
//! - Role resolution after login (inline, fetch by id, admin probe)
//! - Registration default role
//! - Session clearing on 401, refresh failure, logout
//! - is_logged_in consistency rules

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use orderly_client::{
    ApiSettings, AuthService, AuthSettings, ClientError, OrderlyApi, RegistrationRole,
    TokenManager,
};
use orderly_core::Role;

fn service(server: &MockServer, registration: RegistrationRole) -> AuthService {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..Default::default()
    };
    let api = OrderlyApi::new(&settings, TokenManager::in_memory()).unwrap();
    AuthService::new(
        api,
        &AuthSettings {
            registration_default_role: registration,
        },
    )
}

fn jwt(claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

async fn mount_login(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_probe(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!([])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_with_inline_admin_role() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1", "user": { "role": "Admin" } })).await;
    mount_probe(&server, 200, 0).await;

    let auth = service(&server, RegistrationRole::Admin);
    let user = auth.login("ana", "secret").await.unwrap();

    assert!(user.is_admin());
    assert!(auth.is_admin().await);
    assert_eq!(auth.tokens().user_role().await, Some(Role::Admin));
    assert_eq!(auth.tokens().token().await.as_deref(), Some("t1"));
    assert_eq!(auth.tokens().username().await.as_deref(), Some("ana"));
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_login_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "username": "ana", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1",
            "user": { "id": 3, "username": "ana", "role": { "role_id": 2, "name": "USER" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    let user = auth.login("  ana ", "secret").await.unwrap();

    assert_eq!(user.user_id, Some(3));
    assert!(auth.is_customer().await);
}

#[tokio::test]
async fn test_login_token_only_probe_forbidden_is_customer() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1" })).await;
    mount_probe(&server, 403, 1).await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.login("ana", "secret").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Customer));
    assert!(auth.is_customer().await);
    // 403 is not 401: the session survives the probe
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_login_token_only_probe_success_is_admin() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1" })).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("Authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Customer);
    auth.login("ana", "secret").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Admin));
}

#[tokio::test]
async fn test_login_unknown_inline_role_falls_back_to_probe() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1", "user": { "username": "ana", "role": "CHEF" } })).await;
    mount_probe(&server, 403, 1).await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.login("ana", "secret").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Customer));
}

#[tokio::test]
async fn test_login_fetches_user_by_token_id() {
    let server = MockServer::start().await;
    let token = jwt(json!({
        "user_id": 7,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    }));
    mount_login(&server, json!({ "token": token })).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "username": "Ana", "role": "Customer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_probe(&server, 200, 0).await;

    let auth = service(&server, RegistrationRole::Admin);
    let user = auth.login("ana", "secret").await.unwrap();

    assert_eq!(user.username, "Ana");
    assert_eq!(auth.tokens().username().await.as_deref(), Some("Ana"));
    assert_eq!(auth.user_role().await, Some(Role::Customer));
}

#[tokio::test]
async fn test_failed_fetch_by_id_falls_through_to_probe() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": jwt(json!({ "sub": "7" })) })).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_probe(&server, 200, 1).await;

    let auth = service(&server, RegistrationRole::Customer);
    auth.login("ana", "secret").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Admin));
}

#[tokio::test]
async fn test_login_user_without_role_fetches_by_id_then_checks_admin_listing() {
    let server = MockServer::start().await;
    let token = jwt(json!({ "user_id": 7 }));
    mount_login(&server, json!({ "token": token, "user": { "username": "ana" } })).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "username": "ana" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_probe(&server, 200, 1).await;

    let auth = service(&server, RegistrationRole::Customer);
    let user = auth.login("ana", "secret").await.unwrap();

    assert!(user.is_admin());
    assert_eq!(auth.tokens().user_role().await, Some(Role::Admin));
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_unauthorized_during_role_resolution_fails_login() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1" })).await;
    mount_probe(&server, 401, 1).await;

    let auth = service(&server, RegistrationRole::Admin);
    let err = auth.login("ana", "secret").await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert!(auth.tokens().snapshot().await.is_empty());
    assert!(auth.current_user().await.is_none());
    assert!(auth.user_role().await.is_none());
    assert!(!auth.is_logged_in().await);
}

#[tokio::test]
async fn test_failed_login_persists_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    let err = auth.login("ana", "wrong").await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Bad credentials"));
    assert!(auth.tokens().token().await.is_none());
    assert!(auth.current_user().await.is_none());
    assert!(!auth.is_logged_in().await);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    let err = auth.login("", "secret").await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)));

    let err = auth.login("ana", "").await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_registration_defaults_to_admin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t2" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_probe(&server, 403, 0).await;

    let auth = service(&server, RegistrationRole::default());
    let user = auth.register("newbie", "secret1").await.unwrap();

    assert_eq!(user.username, "newbie");
    assert_eq!(auth.user_role().await, Some(Role::Admin));
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_registration_configured_customer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t2" })))
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Customer);
    auth.register("newbie", "secret1").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Customer));
}

#[tokio::test]
async fn test_registration_probe_uses_login_chain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t2" })))
        .mount(&server)
        .await;
    mount_probe(&server, 403, 1).await;

    let auth = service(&server, RegistrationRole::Probe);
    auth.register("newbie", "secret1").await.unwrap();

    assert_eq!(auth.user_role().await, Some(Role::Customer));
}

#[tokio::test]
async fn test_registration_rejects_short_password() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    let err = auth.register("newbie", "123").await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_)));
}

// =============================================================================
// Session Lifecycle
// =============================================================================

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1", "user": { "role": "Customer" } })).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.login("ana", "secret").await.unwrap();
    assert!(auth.is_logged_in().await);

    let err = auth.api().products().list().await.unwrap_err();
    assert!(err.is_auth_error());

    assert!(auth.tokens().token().await.is_none());
    assert!(!auth.is_logged_in().await);
}

#[tokio::test]
async fn test_refresh_success_updates_role() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("Authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new", "user": { "username": "ana", "role": "Customer" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.tokens().save_token("old").await.unwrap();
    auth.tokens().save_username("ana").await.unwrap();
    auth.set_user_role(Role::Admin).await.unwrap();

    auth.refresh_token().await.unwrap();

    assert_eq!(auth.tokens().token().await.as_deref(), Some("new"));
    assert_eq!(auth.user_role().await, Some(Role::Customer));
    assert!(auth.is_logged_in().await);
}

#[tokio::test]
async fn test_refresh_failure_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.tokens().save_token("old").await.unwrap();
    auth.tokens().save_username("ana").await.unwrap();
    auth.load_stored_user_info().await.unwrap();

    let err = auth.refresh_token().await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 500, .. }));

    assert!(auth.tokens().snapshot().await.is_empty());
    assert!(auth.current_user().await.is_none());
    assert!(!auth.is_logged_in().await);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = MockServer::start().await;
    mount_login(&server, json!({ "token": "t1", "user": { "role": "Admin" } })).await;

    let auth = service(&server, RegistrationRole::Admin);
    auth.login("ana", "secret").await.unwrap();

    auth.logout().await.unwrap();

    assert!(auth.tokens().token().await.is_none());
    assert!(auth.tokens().username().await.is_none());
    assert!(auth.tokens().user_role().await.is_none());
    assert!(auth.current_user().await.is_none());
    assert!(!auth.is_logged_in().await);
}

#[tokio::test]
async fn test_token_without_username_is_not_logged_in() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    auth.tokens().save_token("t1").await.unwrap();
    auth.tokens().save_user_role(Role::Customer).await.unwrap();

    assert!(!auth.is_logged_in().await);
    assert!(auth.tokens().snapshot().await.is_empty());
}

#[tokio::test]
async fn test_username_without_token_is_not_logged_in() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    auth.tokens().save_username("ana").await.unwrap();
    auth.tokens().save_user_role(Role::Admin).await.unwrap();

    assert!(!auth.is_logged_in().await);
    assert!(auth.tokens().snapshot().await.is_empty());
    assert!(auth.user_role().await.is_none());
}

#[tokio::test]
async fn test_expired_token_is_not_logged_in() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    let expired = jwt(json!({ "exp": (Utc::now() - Duration::minutes(5)).timestamp() }));
    auth.tokens().save_token(&expired).await.unwrap();
    auth.tokens().save_username("ana").await.unwrap();

    assert!(!auth.is_logged_in().await);
    assert!(auth.tokens().username().await.is_none());
}

#[tokio::test]
async fn test_set_user_role_round_trip() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    for role in [Role::Admin, Role::Customer] {
        auth.set_user_role(role).await.unwrap();
        assert_eq!(auth.user_role().await, Some(role));
    }
}

#[tokio::test]
async fn test_load_stored_user_info() {
    let server = MockServer::start().await;
    let auth = service(&server, RegistrationRole::Admin);

    assert!(auth.load_stored_user_info().await.is_none());

    auth.tokens().save_token("t1").await.unwrap();
    auth.tokens().save_username("ana").await.unwrap();
    auth.tokens().save_user_role(Role::Admin).await.unwrap();

    let user = auth.load_stored_user_info().await.unwrap();
    assert_eq!(user.username, "ana");
    assert!(user.is_admin());
    assert_eq!(auth.current_user().await, Some(user));
}
