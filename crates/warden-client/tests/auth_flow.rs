//! Sign-in, sign-out, and password flows against a mocked service,
//! including session persistence across client instances.

use std::sync::Arc;

use serde_json::{Value, json};
use warden_client::{FileSessionStore, SessionStore, WardenClient};
use warden_core::{LoginRequest, RegisterRequest, ResetPasswordRequest, User};
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

fn login_response(username: &str) -> Value {
    envelope(json!({
        "user": user_json(1, username),
        "access_token": "acc-1",
        "refresh_token": "ref-1"
    }))
}

#[tokio::test]
async fn login_stores_credentials_and_authenticates_later_calls() {
    let server = MockServer::start().await;
    let client = WardenClient::connect(server.uri()).await.expect("client");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(
            json!({"email": "alice@example.com", "password": "secret"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("alice")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(user_json(1, "alice"))))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client
        .auth()
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(tokens.user.username, "alice");

    let session = client.session();
    assert!(session.is_authenticated().await);
    assert_eq!(session.access_token().await.as_deref(), Some("acc-1"));
    assert_eq!(session.refresh_token().await.as_deref(), Some("ref-1"));

    // The stored token authenticates the next call.
    let me = client.auth().me().await.expect("me");
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn register_signs_the_new_account_in() {
    let server = MockServer::start().await;
    let client = WardenClient::connect(server.uri()).await.expect("client");

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "user": user_json(2, "bob"),
            "access_token": "acc-2",
            "refresh_token": "ref-2"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    client
        .auth()
        .register(RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("register");

    assert!(client.session().is_authenticated().await);
    assert_eq!(
        client.session().current_user().await.map(|u| u.username),
        Some("bob".to_string())
    );
}

#[tokio::test]
async fn session_survives_a_client_restart_through_the_file_store() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let session_path = dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("alice")))
        .expect(1)
        .mount(&server)
        .await;

    {
        let client = WardenClient::builder(server.uri())
            .with_store(Arc::new(FileSessionStore::new(&session_path)))
            .build()
            .await
            .expect("client");
        client
            .auth()
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .expect("login");
    }

    // The record on disk uses the original console's field names.
    let raw = std::fs::read_to_string(&session_path).expect("session file");
    let record: Value = serde_json::from_str(&raw).expect("session json");
    assert_eq!(record["token"], "acc-1");
    assert_eq!(record["refreshToken"], "ref-1");
    assert_eq!(record["isAuthenticated"], true);

    // A fresh client picks the session up without logging in again.
    let restarted = WardenClient::builder(server.uri())
        .with_store(Arc::new(FileSessionStore::new(&session_path)))
        .build()
        .await
        .expect("restarted client");
    assert!(restarted.session().is_authenticated().await);
    assert_eq!(
        restarted.session().access_token().await.as_deref(),
        Some("acc-1")
    );
    assert_eq!(
        restarted.session().current_user().await.map(|u| u.username),
        Some("alice".to_string())
    );
}

#[tokio::test]
async fn logout_clears_local_state_even_when_the_server_fails() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let session_path = dir.path().join("session.json");
    let store = Arc::new(FileSessionStore::new(&session_path));

    let client = WardenClient::builder(server.uri())
        .with_store(store.clone())
        .build()
        .await
        .expect("client");
    let user: User = serde_json::from_value(user_json(1, "alice")).expect("user json");
    client
        .session()
        .set_credentials(Some(user), "acc-1", "ref-1")
        .await
        .expect("seed session");

    // Prime the cache so we can observe it being dropped.
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    client.users().list().await.expect("list");
    assert_eq!(client.cache_stats().size, 1);

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(error_envelope("token registry down")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.auth().logout().await.expect_err("server error");
    assert!(err.is_server_error());

    // Local session, persisted record, and cache are gone regardless.
    assert!(!client.session().is_authenticated().await);
    assert!(client.session().access_token().await.is_none());
    assert_eq!(store.load().await.expect("load"), None);
    assert_eq!(client.cache_stats().size, 0);
}

#[tokio::test]
async fn failed_login_surfaces_the_service_message() {
    let server = MockServer::start().await;
    let client = WardenClient::connect(server.uri()).await.expect("client");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(error_envelope("Invalid email or password")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .auth()
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("must fail");

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Invalid email or password"));
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn password_reset_flow_round_trips() {
    let server = MockServer::start().await;
    let client = WardenClient::connect(server.uri()).await.expect("client");

    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(body_json(json!({"email": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;
    // The link check answers document-style: fields beside `status`, no
    // `data` envelope.
    Mock::given(method("GET"))
        .and(path("/auth/reset-password/tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Token is valid",
            "reset_url": "https://console.example.com/reset-password/tok-123"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_json(
            json!({"reset_token": "tok-123", "new_password": "n3w-secret"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null)))
        .expect(1)
        .mount(&server)
        .await;

    client
        .auth()
        .forgot_password("alice@example.com")
        .await
        .expect("forgot");

    let check = client
        .auth()
        .check_reset_link("tok-123")
        .await
        .expect("check link");
    assert_eq!(check.message.as_deref(), Some("Token is valid"));
    assert!(
        check
            .reset_url
            .as_deref()
            .is_some_and(|url| url.ends_with("tok-123"))
    );

    client
        .auth()
        .reset_password(ResetPasswordRequest {
            reset_token: "tok-123".to_string(),
            new_password: "n3w-secret".to_string(),
        })
        .await
        .expect("reset");
}

#[tokio::test]
async fn me_refreshes_the_stored_user() {
    let server = MockServer::start().await;
    let client = WardenClient::connect(server.uri()).await.expect("client");
    let user: User = serde_json::from_value(user_json(1, "alice")).expect("user json");
    client
        .session()
        .set_credentials(Some(user), "acc-1", "ref-1")
        .await
        .expect("seed session");

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(user_json(1, "alice-renamed"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let me = client.auth().me().await.expect("me");
    assert_eq!(me.username, "alice-renamed");
    assert_eq!(
        client.session().current_user().await.map(|u| u.username),
        Some("alice-renamed".to_string())
    );
}
