//! End to end: a real gateway on a local port, a mocked identity backend, and
//! the cookie-keeping console client driving the session.

#![allow(clippy::unwrap_used)]

use console_gateway::{
    client::{ClientError, ConsoleClient, RefreshScheduler},
    gateway::{router, GatewayConfig, GatewayState},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_gateway(upstream: &MockServer) -> String {
    let config = GatewayConfig::new(Url::parse(&upstream.uri()).unwrap());
    let app = router(Arc::new(GatewayState::new(config).unwrap()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    format!("http://{addr}")
}

async fn mock_login(upstream: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "user": {"id": 7, "email": "ops@console.dev", "role": "admin"},
            "token": {"access_token": "T1", "expires_in": 900, "refresh_token": "R1"}
        })))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn login_refresh_logout() {
    let upstream = MockServer::start().await;
    mock_login(&upstream).await;
    Mock::given(method("POST"))
        .and(path("/api/users/refresh"))
        .and(header("cookie", "refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": {"access_token": "T2", "refresh_token": "R2"}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(&upstream).await;
    let client = ConsoleClient::new(&gateway).unwrap();

    // No session yet.
    assert!(matches!(
        client.token().await,
        Err(ClientError::Unauthenticated(_))
    ));

    let login = client
        .login("ops@console.dev", &SecretString::from("secret"))
        .await
        .unwrap();
    assert_eq!(login.message, "ok");
    assert_eq!(login.user.unwrap().email.as_deref(), Some("ops@console.dev"));
    assert_eq!(client.token().await.unwrap().expose_secret(), "T1");

    client.refresh().await.unwrap();
    assert_eq!(client.token().await.unwrap().expose_secret(), "T2");

    client.logout().await.unwrap();
    match client.token().await {
        Err(ClientError::Unauthenticated(message)) => assert_eq!(message, "No token found"),
        other => panic!("expected unauthenticated, got {other:?}"),
    }

    // Refresh without a refresh cookie never reaches upstream.
    assert!(matches!(
        client.refresh().await,
        Err(ClientError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn failed_login_keeps_upstream_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(&upstream).await;
    let client = ConsoleClient::new(&gateway).unwrap();

    match client
        .login("ops@console.dev", &SecretString::from("wrong"))
        .await
    {
        // The body is not the gateway's own `{error}` shape, so it surfaces as is.
        Err(ClientError::Rejected { status, body }) => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(
                serde_json::from_str::<serde_json::Value>(&body).unwrap(),
                json!({"detail": "Invalid credentials"})
            );
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(client.token().await.is_err());
}

#[tokio::test]
async fn scheduler_rotates_access_token() {
    let upstream = MockServer::start().await;
    mock_login(&upstream).await;
    Mock::given(method("POST"))
        .and(path("/api/users/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": {"access_token": "T2", "refresh_token": "R2"}
        })))
        .mount(&upstream)
        .await;

    let gateway = spawn_gateway(&upstream).await;
    let client = Arc::new(ConsoleClient::new(&gateway).unwrap());
    client
        .login("ops@console.dev", &SecretString::from("secret"))
        .await
        .unwrap();

    let mut scheduler =
        RefreshScheduler::new(Arc::clone(&client)).with_interval(Duration::from_secs(1));
    assert!(scheduler.activate());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    scheduler.deactivate();

    let refreshes = upstream
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/api/users/refresh")
        .count();
    assert!(refreshes >= 1, "refreshes: {refreshes}");
    assert_eq!(client.token().await.unwrap().expose_secret(), "T2");
}
