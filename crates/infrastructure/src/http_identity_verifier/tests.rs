use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::IntoResponse;
use axum::routing::get;
use catalog_application::{AuthRejection, IdentityVerifier};
use catalog_core::BearerToken;

use super::HttpIdentityVerifier;

async fn me_handler(headers: HeaderMap) -> impl IntoResponse {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authorization {
        Some("Bearer good-token") => (
            StatusCode::OK,
            r#"{"user":{"email":"admin@example.com","role":"admin"}}"#,
        ),
        Some("Bearer garbled-token") => (StatusCode::OK, r#"{"user":"#),
        _ => (StatusCode::UNAUTHORIZED, r#"{"message":"Unauthenticated."}"#),
    }
}

async fn slow_handler() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(500)).await;
    StatusCode::OK
}

async fn spawn_identity_service() -> SocketAddr {
    let app = Router::new()
        .route("/api/me", get(me_handler))
        .route("/api/slow", get(slow_handler));
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind test listener: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read test listener address: {error}"),
    };

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    address
}

fn verifier(address: SocketAddr, path: &str, timeout: Duration) -> HttpIdentityVerifier {
    HttpIdentityVerifier::new(
        reqwest::Client::new(),
        format!("http://{address}{path}"),
        timeout,
    )
}

fn token(value: &str) -> BearerToken {
    let header = format!("Bearer {value}");
    match BearerToken::from_authorization_header(Some(header.as_str())) {
        Some(token) => token,
        None => panic!("test token must parse"),
    }
}

#[tokio::test]
async fn accepted_token_yields_identity() {
    let address = spawn_identity_service().await;
    let verifier = verifier(address, "/api/me", Duration::from_secs(2));

    let identity = verifier.verify(&token("good-token")).await;
    let Ok(identity) = identity else {
        panic!("expected identity");
    };

    assert_eq!(identity.email(), "admin@example.com");
    assert_eq!(identity.role(), "admin");
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let address = spawn_identity_service().await;
    let verifier = verifier(address, "/api/me", Duration::from_secs(2));

    let result = verifier.verify(&token("expired-token")).await;
    assert_eq!(result.err(), Some(AuthRejection::UpstreamUnauthorized));
}

#[tokio::test]
async fn unparseable_body_is_malformed() {
    let address = spawn_identity_service().await;
    let verifier = verifier(address, "/api/me", Duration::from_secs(2));

    let result = verifier.verify(&token("garbled-token")).await;
    assert_eq!(result.err(), Some(AuthRejection::UpstreamMalformed));
}

#[tokio::test]
async fn slow_service_times_out_as_unavailable() {
    let address = spawn_identity_service().await;
    let verifier = verifier(address, "/api/slow", Duration::from_millis(50));

    let result = verifier.verify(&token("good-token")).await;
    assert_eq!(result.err(), Some(AuthRejection::UpstreamUnavailable));
}

#[tokio::test]
async fn unreachable_service_is_unavailable() {
    let address = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => match listener.local_addr() {
            Ok(address) => address,
            Err(error) => panic!("failed to read test listener address: {error}"),
        },
        Err(error) => panic!("failed to bind test listener: {error}"),
    };
    let verifier = verifier(address, "/api/me", Duration::from_secs(2));

    let result = verifier.verify(&token("good-token")).await;
    assert_eq!(result.err(), Some(AuthRejection::UpstreamUnavailable));
}
