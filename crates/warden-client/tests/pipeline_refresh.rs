//! End-to-end coverage for the 401 refresh-and-replay pipeline.

use std::sync::Arc;

use serde_json::{Value, json};
use warden_client::{MemorySessionStore, Session, SessionStore, WardenClient};
use warden_core::User;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: Value) -> Value {
    json!({"status": "success", "message": "ok", "data": data})
}

fn error_envelope(message: &str) -> Value {
    json!({"status": "error", "message": message})
}

fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "created_at": "2024-05-15T14:30:00.123456",
        "is_active": true
    })
}

fn sample_user() -> User {
    serde_json::from_value(user_json(1, "alice")).expect("user json")
}

async fn signed_in_client(server: &MockServer) -> WardenClient {
    let client = WardenClient::connect(server.uri()).await.expect("client");
    client
        .session()
        .set_credentials(Some(sample_user()), "access-0", "refresh-0")
        .await
        .expect("seed session");
    client
}

#[tokio::test]
async fn bearer_token_attached_to_requests() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let users = client.users().list().await.expect("list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn expired_token_refreshed_and_request_replayed() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    // First attempt with the stale token is rejected.
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-0"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Token has expired")))
        .expect(1)
        .mount(&server)
        .await;

    // The refresh exchanges the stored refresh token; no rotation here, the
    // answer carries only a new access token.
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": "refresh-0"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({"access_token": "access-1"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    // The replay carries the fresh token.
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!([user_json(1, "alice")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let users = client.users().list().await.expect("list after refresh");
    assert_eq!(users.len(), 1);

    // The session rotated the access token, kept the refresh token, and
    // still knows the signed-in user.
    let session = client.session();
    assert_eq!(session.access_token().await.as_deref(), Some("access-1"));
    assert_eq!(session.refresh_token().await.as_deref(), Some("refresh-0"));
    assert_eq!(
        session.current_user().await.map(|user| user.username),
        Some("alice".to_string())
    );
    assert!(session.is_authenticated().await);
}

#[tokio::test]
async fn explicit_refresh_stores_rotated_pair() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": "refresh-0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let refreshed = client.auth().refresh().await.expect("refresh");
    assert_eq!(refreshed.access_token, "access-1");

    let session = client.session();
    assert_eq!(session.access_token().await.as_deref(), Some("access-1"));
    assert_eq!(session.refresh_token().await.as_deref(), Some("refresh-1"));
    assert_eq!(
        session.current_user().await.map(|user| user.username),
        Some("alice".to_string())
    );
}

#[tokio::test]
async fn missing_refresh_token_clears_session_and_surfaces_401() {
    let server = MockServer::start().await;

    // A partial session: access token present, refresh token gone. Seed it
    // through the store so the client restores it as-is.
    let store = Arc::new(MemorySessionStore::new());
    let session = Session {
        user: Some(sample_user()),
        access_token: Some("access-0".to_string()),
        refresh_token: None,
        is_authenticated: true,
    };
    store.save(&session).await.expect("seed store");

    let client = WardenClient::builder(server.uri())
        .with_store(store)
        .build()
        .await
        .expect("client");
    assert!(client.session().is_authenticated().await);

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Token has expired")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.users().list().await.expect_err("must fail");
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Token has expired"));

    // Local state and the store are wiped.
    assert!(!client.session().is_authenticated().await);
    assert!(client.session().access_token().await.is_none());
}

#[tokio::test]
async fn rejected_refresh_logs_out_and_surfaces_original_401() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Token has expired")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_envelope("Invalid refresh token")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.users().list().await.expect_err("must fail");

    // The caller sees the original rejection, not the refresh exchange's.
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Token has expired"));

    assert!(!client.session().is_authenticated().await);
    assert!(client.session().refresh_token().await.is_none());
}

#[tokio::test]
async fn replayed_request_may_fail_again_without_second_refresh() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-0"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_envelope("Token has expired")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({"access_token": "access-1"}))),
        )
        .expect(1)
        .mount(&server)
        .await;
    // The replay is rejected as well; its outcome must come back verbatim
    // with no second recovery round.
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_envelope("Account is deactivated")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.users().list().await.expect_err("must fail");
    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Account is deactivated"));

    // The refresh itself succeeded, so the session stays signed in with the
    // rotated token.
    assert!(client.session().is_authenticated().await);
    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("access-1")
    );
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
    let server = MockServer::start().await;
    let client = signed_in_client(&server).await;

    // Delay the stale-token rejections so both calls are in flight before
    // either starts recovering.
    let slow_401 = ResponseTemplate::new(401)
        .set_body_json(error_envelope("Token has expired"))
        .set_delay(std::time::Duration::from_millis(100));

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-0"))
        .respond_with(slow_401.clone())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .and(header("authorization", "Bearer access-0"))
        .respond_with(slow_401)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({"access_token": "access-1"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    let users_api = client.users();
    let roles_api = client.roles();
    let (users, roles) = tokio::join!(users_api.list(), roles_api.list());
    users.expect("users list");
    roles.expect("roles list");

    assert_eq!(
        client.session().access_token().await.as_deref(),
        Some("access-1")
    );
}

#[tokio::test]
async fn unreachable_server_reports_transport_error() {
    // Bind an ephemeral port, then free it so nothing is listening there.
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = WardenClient::connect(format!("http://{addr}"))
        .await
        .expect("client");

    let err = client.users().list().await.expect_err("must fail");
    assert!(err.is_transport());
}
