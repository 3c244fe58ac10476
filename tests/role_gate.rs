#![allow(clippy::expect_used)]

//! Role checks and account re-validation. The guard re-reads the account a
//! token names, so every caller here is a seeded user.

mod common;

use axum::http::{Method, StatusCode};
use barangay_backend::models::auth::Role;
use serde_json::json;
use sqlx::PgPool;

use common::{config_with, insert_barangay, insert_user, router, send, state_with_pool, token_for};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn staff_cannot_delete_residents(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let staff = insert_user(&pool, Role::Staff, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, staff);
    let (status, body) = send(router(state), Method::DELETE, "/api/residents/42", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn residents_cannot_browse_the_registry(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_user(&pool, Role::Resident, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, resident);

    for uri in ["/api/residents", "/api/households", "/api/documents", "/api/dashboard/stats"] {
        let (status, _) = send(router(state.clone()), Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn only_super_admins_create_barangays(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let state = state_with_pool(pool.clone(), config_with(&[]));
    let body = json!({ "name": "San Roque", "municipality": "Marikina", "province": "Metro Manila" });

    for role in [Role::Staff, Role::BarangayAdmin, Role::Captain] {
        let caller = insert_user(&pool, role, Some(barangay)).await;
        let token = token_for(&state, caller);
        let (status, _) = send(
            router(state.clone()),
            Method::POST,
            "/api/barangays",
            Some(&token),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{role:?}");
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn secretary_cannot_approve_permits(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let secretary = insert_user(&pool, Role::Secretary, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, secretary);
    let (status, _) = send(
        router(state),
        Method::PATCH,
        "/api/permits/1/status",
        Some(&token),
        Some(json!({ "status": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn treasurer_cannot_approve_registrations(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let treasurer = insert_user(&pool, Role::Treasurer, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, treasurer);
    let (status, _) = send(router(state), Method::PATCH, "/api/users/9/approve", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn deleted_account_loses_access_immediately(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .expect("delete user");

    let (status, body) = send(router(state), Method::GET, "/api/residents", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token is not valid");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn deactivated_account_loses_access_immediately(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let staff = insert_user(&pool, Role::Staff, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, staff);

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(staff.id)
        .execute(&pool)
        .await
        .expect("deactivate");

    let (status, body) = send(router(state), Method::GET, "/api/residents", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Account is deactivated");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn demotion_applies_to_tokens_already_issued(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    sqlx::query("UPDATE users SET role = 'staff' WHERE id = $1")
        .bind(admin.id)
        .execute(&pool)
        .await
        .expect("demote");

    let (status, _) = send(router(state), Method::DELETE, "/api/residents/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn moving_barangays_moves_the_scope(pool: PgPool) {
    let old = insert_barangay(&pool, "Poblacion").await;
    let new = insert_barangay(&pool, "San Isidro").await;
    let staff = insert_user(&pool, Role::Staff, Some(old)).await;
    let old_resident = common::insert_resident(&pool, old, "Maria").await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, staff);

    sqlx::query("UPDATE users SET barangay_id = $1 WHERE id = $2")
        .bind(new)
        .bind(staff.id)
        .execute(&pool)
        .await
        .expect("move");

    let (status, _) = send(
        router(state),
        Method::GET,
        &format!("/api/residents/{old_resident}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
