#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use barangay_backend::{
    config::{AppConfig, AppState},
    models::auth::{Principal, Role},
    routes::build_router,
    services::notification::LogNotifier,
};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

pub fn config_with(extra: &[(&str, &str)]) -> AppConfig {
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(move |key| {
        if let Some((_, value)) = extra.iter().find(|(k, _)| k == key) {
            return Some(value.clone());
        }
        match key {
            "DATABASE_URL" => Some("postgres://localhost/barangay_unused".to_string()),
            "JWT_SECRET" => Some("integration-secret".to_string()),
            _ => None,
        }
    })
    .expect("test config")
}

pub fn state_with_pool(pool: PgPool, config: AppConfig) -> AppState {
    AppState::with_pool(pool, config, Arc::new(LogNotifier))
}

/// State over a pool that never connects; fine for requests rejected before
/// any query runs.
pub fn offline_state(config: AppConfig) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    state_with_pool(pool, config)
}

pub fn principal(id: i64, role: Role, barangay_id: Option<i64>) -> Principal {
    Principal { id, role, barangay_id }
}

pub fn token_for(state: &AppState, principal: Principal) -> String {
    state
        .auth_service
        .access_token_for(&principal)
        .expect("token")
}

pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, value)
}

pub fn router(state: AppState) -> Router {
    build_router(state)
}

pub async fn insert_barangay(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO barangays (name, municipality, province) VALUES ($1, 'Quezon City', 'Metro Manila') RETURNING id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("barangay")
}

/// An active, approved account; its id is what tokens must name.
pub async fn insert_user(pool: &PgPool, role: Role, barangay_id: Option<i64>) -> Principal {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users
            (barangay_id, email, password_hash, first_name, last_name, role, is_approved, approval_status)
        VALUES ($1, 'user-' || gen_random_uuid() || '@example.com', 'unused', 'Test', 'User', $2, TRUE, 'approved')
        RETURNING id
        "#,
    )
    .bind(barangay_id)
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("user");
    principal(id, role, barangay_id)
}

pub async fn insert_resident(pool: &PgPool, barangay_id: i64, first_name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO residents (barangay_id, first_name, last_name, birth_date, gender)
        VALUES ($1, $2, 'Dela Cruz', DATE '1990-05-20', 'female')
        RETURNING id
        "#,
    )
    .bind(barangay_id)
    .bind(first_name)
    .fetch_one(pool)
    .await
    .expect("resident")
}

pub async fn insert_business(pool: &PgPool, barangay_id: i64, name: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO businesses (barangay_id, name, business_type, owner_name, address)
        VALUES ($1, $2, 'sari-sari store', 'Pedro Reyes', 'Purok 3')
        RETURNING id
        "#,
    )
    .bind(barangay_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("business")
}
