//! Login and registration against a mock auth API.

use std::sync::Arc;

use mockito::{Matcher, Server};
use serde_json::json;

use taskboard::auth::Auth;
use taskboard::config::Config;
use taskboard::navigation::{Route, Router};
use taskboard::notify::{Notice, Toasts};
use taskboard::{ApiClient, AuthError, Session};

fn auth_for(server: &Server, session: &Session) -> (Auth, Router, Toasts) {
    let config = Config::default().with_api_url(Some(server.url()));
    let api = Arc::new(ApiClient::new(&config, session.clone()).unwrap());
    let router = Router::new(session.clone());
    let toasts = Toasts::new();
    let auth = Auth::new(
        api,
        session.clone(),
        Arc::new(router.clone()),
        Arc::new(toasts.clone()),
    );
    (auth, router, toasts)
}

#[tokio::test]
async fn login_persists_access_token() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "ada@example.com", "password": "pw"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"accessToken":"jwt-123"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session");
    let session = Session::load(&path);
    let (auth, router, _) = auth_for(&server, &session);

    auth.login("ada@example.com", "pw").await.unwrap();

    login.assert_async().await;
    assert_eq!(router.current(), Route::Board);
    assert_eq!(Session::load(&path).token().as_deref(), Some("jwt-123"));
}

#[tokio::test]
async fn rejected_login_notifies() {
    let mut server = Server::new_async().await;
    let _rejected = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"message":"Invalid credentials"}"#)
        .create_async()
        .await;

    let session = Session::in_memory();
    let (auth, router, toasts) = auth_for(&server, &session);

    let err = auth.login("ada@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::Login(_)));
    assert_eq!(router.current(), Route::Login);
    assert_eq!(
        toasts.latest(),
        Some(Notice::error("Login failed. Check your credentials."))
    );
}

#[tokio::test]
async fn register_posts_profile_and_redirects_to_login() {
    let mut server = Server::new_async().await;
    let register = server
        .mock("POST", "/auth/register")
        .match_body(Matcher::Json(json!({
            "email": "ada@example.com",
            "password": "pw",
            "firstname": "Ada",
            "lastname": "Lovelace"
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let session = Session::in_memory();
    let (auth, router, toasts) = auth_for(&server, &session);

    auth.register("ada@example.com", "pw", "Ada", "Lovelace")
        .await
        .unwrap();

    register.assert_async().await;
    assert_eq!(router.current(), Route::Login);
    assert_eq!(
        toasts.latest(),
        Some(Notice::success("Registration successful! Please log in."))
    );
    assert!(!session.is_authenticated());
}
