#![allow(clippy::expect_used)]

//! Requests rejected while the token itself is checked never reach a query,
//! so these run against a pool that never connects.

mod common;

use axum::http::{Method, StatusCode};
use barangay_backend::models::auth::Role;
use serde_json::json;

use common::{config_with, offline_state, principal, router, send, token_for};

#[tokio::test]
async fn health_is_public() {
    let state = offline_state(config_with(&[]));
    let (status, body) = send(router(state), Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let state = offline_state(config_with(&[]));
    let (status, body) = send(router(state), Method::GET, "/api/residents", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token, authorization denied");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let state = offline_state(config_with(&[]));
    let (status, body) = send(
        router(state),
        Method::GET,
        "/api/residents",
        Some("not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
    assert!(body.get("code").is_none());
}

#[tokio::test]
async fn expired_token_carries_a_code() {
    // Tokens minted with a negative lifetime are already past the validation leeway.
    let expired_state = offline_state(config_with(&[("ACCESS_TOKEN_TTL_MINUTES", "-10")]));
    let token = token_for(&expired_state, principal(3, Role::Staff, Some(5)));

    let state = offline_state(config_with(&[]));
    let (status, body) = send(router(state), Method::GET, "/api/residents", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_invalid() {
    let foreign = offline_state(config_with(&[("JWT_SECRET", "someone-else")]));
    let token = token_for(&foreign, principal(1, Role::SuperAdmin, None));

    let state = offline_state(config_with(&[]));
    let (status, body) = send(router(state), Method::GET, "/api/dashboard/stats", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[tokio::test]
async fn refresh_token_cannot_be_used_as_access_token() {
    let state = offline_state(config_with(&[]));
    let pair = state
        .auth_service
        .issue_tokens(&principal(4, Role::Staff, Some(5)))
        .expect("tokens");

    let (status, _) = send(router(state), Method::GET, "/api/auth/me", Some(&pair.refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_routes_are_not_found_before_auth() {
    let state = offline_state(config_with(&[]));
    let (status, _) = send(router(state), Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
