#![allow(clippy::expect_used)]

//! End-to-end scenarios against PostgreSQL. Run with
//! `cargo test -- --ignored` and a `DATABASE_URL` pointing at a server the
//! tests may create databases on.

mod common;

use axum::http::{Method, StatusCode};
use barangay_backend::{
    models::auth::Role,
    policy::{
        sequence::{format_code, local_year, next_sequence, CODE_ATTEMPTS},
        CodeSeries,
    },
};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use common::{
    config_with, insert_barangay, insert_business, insert_resident, insert_user, router, send,
    state_with_pool, token_for,
};

/// Year the server numbers today's records under.
fn current_code_year() -> i32 {
    local_year(Utc::now(), config_with(&[]).records_utc_offset)
}

/// A document created two years ago that already holds `control_number`,
/// so it takes a code without counting toward this year's seed.
async fn insert_old_document(
    pool: &PgPool,
    barangay_id: i64,
    resident_id: i64,
    control_number: &str,
) {
    sqlx::query(
        r#"
        INSERT INTO documents (barangay_id, resident_id, document_type, control_number, purpose, created_at)
        VALUES ($1, $2, 'barangay_clearance', $3, 'Imported', NOW() - INTERVAL '2 years')
        "#,
    )
    .bind(barangay_id)
    .bind(resident_id)
    .bind(control_number)
    .execute(pool)
    .await
    .expect("old document");
}

async fn stored_status(pool: &PgPool, table: &str, id: i64) -> String {
    sqlx::query_scalar(&format!("SELECT status::text FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("row kept")
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn other_barangays_records_look_absent(pool: PgPool) {
    let own = insert_barangay(&pool, "Poblacion").await;
    let other = insert_barangay(&pool, "San Isidro").await;
    let foreign_resident = insert_resident(&pool, other, "Maria").await;
    let staff = insert_user(&pool, Role::Staff, Some(own)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, staff);

    let (status, body) = send(
        router(state),
        Method::GET,
        &format!("/api/residents/{foreign_resident}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Resident not found" }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn staff_cannot_read_another_barangay_by_naming_it(pool: PgPool) {
    let own = insert_barangay(&pool, "Poblacion").await;
    let other = insert_barangay(&pool, "San Isidro").await;
    insert_resident(&pool, own, "Ana").await;
    let foreign_resident = insert_resident(&pool, other, "Maria").await;
    let staff = insert_user(&pool, Role::Staff, Some(own)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, staff);

    let (status, body) = send(
        router(state.clone()),
        Method::GET,
        &format!("/api/residents?barangay_id={other}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["residents"][0]["barangay_id"], own);

    let (status, _) = send(
        router(state),
        Method::GET,
        &format!("/api/residents/{foreign_resident}?barangay_id={other}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn pending_resident_cannot_sign_in(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let hash = bcrypt::hash("correct-horse", 4).expect("hash");
    sqlx::query(
        r#"
        INSERT INTO users (barangay_id, email, password_hash, first_name, last_name, role)
        VALUES ($1, 'juan@example.com', $2, 'Juan', 'Santos', 'resident')
        "#,
    )
    .bind(barangay)
    .bind(hash)
    .execute(&pool)
    .await
    .expect("user");

    let state = state_with_pool(pool, config_with(&[]));
    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "juan@example.com", "password": "correct-horse" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["approval_status"], "pending");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn super_admin_picks_the_barangay_of_new_records(pool: PgPool) {
    insert_barangay(&pool, "Poblacion").await;
    let target = insert_barangay(&pool, "San Isidro").await;
    let root = insert_user(&pool, Role::SuperAdmin, None).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, root);

    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/residents",
        Some(&token),
        Some(json!({
            "barangay_id": target,
            "first_name": "Ana",
            "last_name": "Reyes",
            "birth_date": "1985-02-14",
            "gender": "female"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resident"]["barangay_id"], target);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn barangay_admin_request_for_another_barangay_is_ignored(pool: PgPool) {
    let own = insert_barangay(&pool, "Poblacion").await;
    let other = insert_barangay(&pool, "San Isidro").await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(own)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, admin);

    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/residents",
        Some(&token),
        Some(json!({
            "barangay_id": other,
            "first_name": "Ana",
            "last_name": "Reyes",
            "birth_date": "1985-02-14",
            "gender": "female"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["resident"]["barangay_id"], own);
}

// ---
// Accounts
// ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn admins_cannot_delete_themselves(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, body) = send(
        router(state),
        Method::DELETE,
        &format!("/api/users/{}", admin.id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot delete your own account");
    let still_there: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(admin.id)
        .fetch_one(&pool)
        .await
        .expect("exists");
    assert!(still_there);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn super_admins_are_invisible_to_barangay_admins(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let root = insert_user(&pool, Role::SuperAdmin, Some(barangay)).await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, admin);

    let (status, body) = send(
        router(state.clone()),
        Method::GET,
        &format!("/api/users/{}", root.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "User not found" }));

    let (status, _) = send(
        router(state),
        Method::DELETE,
        &format!("/api/users/{}", root.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---
// Sequence codes
// ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn clearance_numbers_run_in_sequence(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let offset = config_with(&[]).records_utc_offset;

    let first = next_sequence(&pool, barangay, CodeSeries::Document, 2024, offset)
        .await
        .expect("first");
    let second = next_sequence(&pool, barangay, CodeSeries::Document, 2024, offset)
        .await
        .expect("second");

    assert_eq!(format_code("BAR", 2024, first), "BAR-2024-00001");
    assert_eq!(format_code("BAR", 2024, second), "BAR-2024-00002");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn document_requests_get_type_prefixed_control_numbers(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let secretary = insert_user(&pool, Role::Secretary, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, secretary);

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let (status, body) = send(
            router(state.clone()),
            Method::POST,
            "/api/documents",
            Some(&token),
            Some(json!({
                "resident_id": resident,
                "document_type": "barangay_clearance",
                "purpose": "Employment"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        numbers.push(body["document"]["control_number"].as_str().expect("number").to_string());
    }

    let year = current_code_year();
    assert_eq!(numbers[0], format_code("BAR", year, 1));
    assert_eq!(numbers[1], format_code("BAR", year, 2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn permits_and_blotter_entries_get_their_prefixes(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let business = insert_business(&pool, barangay, "Aling Nena Store").await;
    let staff = insert_user(&pool, Role::Staff, Some(barangay)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, staff);
    let year = current_code_year();

    let (status, body) = send(
        router(state.clone()),
        Method::POST,
        "/api/permits",
        Some(&token),
        Some(json!({ "business_id": business, "permit_type": "new" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["permit"]["permit_number"], format_code("BP", year, 1));

    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/incidents",
        Some(&token),
        Some(json!({
            "incident_type": "noise complaint",
            "incident_date": "2024-06-01T21:30:00Z",
            "location": "Purok 2",
            "description": "Karaoke past curfew",
            "complainant_name": "Jose Rizal"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["incident"]["blotter_number"], format_code("BLT", year, 1));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn taken_control_number_is_skipped(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let secretary = insert_user(&pool, Role::Secretary, Some(barangay)).await;
    let year = current_code_year();
    insert_old_document(&pool, barangay, resident, &format_code("BAR", year, 1)).await;

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, secretary);

    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/documents",
        Some(&token),
        Some(json!({
            "resident_id": resident,
            "document_type": "barangay_clearance",
            "purpose": "Scholarship"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["document"]["control_number"], format_code("BAR", year, 2));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn exhausted_retries_report_a_conflict(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let secretary = insert_user(&pool, Role::Secretary, Some(barangay)).await;
    let year = current_code_year();
    for n in 1..=CODE_ATTEMPTS as i64 {
        insert_old_document(&pool, barangay, resident, &format_code("BAR", year, n)).await;
    }

    let state = state_with_pool(pool, config_with(&[]));
    let token = token_for(&state, secretary);

    let (status, body) = send(
        router(state),
        Method::POST,
        "/api/documents",
        Some(&token),
        Some(json!({
            "resident_id": resident,
            "document_type": "barangay_clearance",
            "purpose": "Scholarship"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Could not allocate a unique control number, please try again"
    );
}

// ---
// Soft delete
// ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn deleting_a_resident_retires_it(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, _) = send(
        router(state.clone()),
        Method::DELETE,
        &format!("/api/residents/{resident}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_status(&pool, "residents", resident).await, "inactive");

    let (_, body) = send(router(state), Method::GET, "/api/residents", Some(&token), None).await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn deceased_residents_are_not_retired(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    sqlx::query("UPDATE residents SET status = 'deceased' WHERE id = $1")
        .bind(resident)
        .execute(&pool)
        .await
        .expect("deceased");
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, body) = send(
        router(state),
        Method::DELETE,
        &format!("/api/residents/{resident}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot change status from deceased to inactive");
    assert_eq!(stored_status(&pool, "residents", resident).await, "deceased");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn released_documents_cannot_be_cancelled(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let document: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO documents (barangay_id, resident_id, document_type, control_number, purpose, status)
        VALUES ($1, $2, 'barangay_clearance', 'BAR-2024-00001', 'Employment', 'released')
        RETURNING id
        "#,
    )
    .bind(barangay)
    .bind(resident)
    .fetch_one(&pool)
    .await
    .expect("document");
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, body) = send(
        router(state),
        Method::DELETE,
        &format!("/api/documents/{document}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot change status from released to cancelled");
    assert_eq!(stored_status(&pool, "documents", document).await, "released");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn pending_documents_are_cancelled_on_delete(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let resident = insert_resident(&pool, barangay, "Maria").await;
    let document: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO documents (barangay_id, resident_id, document_type, control_number, purpose)
        VALUES ($1, $2, 'barangay_clearance', 'BAR-2024-00001', 'Employment')
        RETURNING id
        "#,
    )
    .bind(barangay)
    .bind(resident)
    .fetch_one(&pool)
    .await
    .expect("document");
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, _) = send(
        router(state),
        Method::DELETE,
        &format!("/api/documents/{document}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored_status(&pool, "documents", document).await, "cancelled");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn completed_events_cannot_be_cancelled(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let event: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO events (barangay_id, title, location, start_at, status)
        VALUES ($1, 'Clean-up drive', 'Covered court', NOW() - INTERVAL '3 days', 'completed')
        RETURNING id
        "#,
    )
    .bind(barangay)
    .fetch_one(&pool)
    .await
    .expect("event");
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, _) = send(
        router(state),
        Method::DELETE,
        &format!("/api/events/{event}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stored_status(&pool, "events", event).await, "completed");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs PostgreSQL"]
async fn rejected_permits_cannot_be_revoked(pool: PgPool) {
    let barangay = insert_barangay(&pool, "Poblacion").await;
    let business = insert_business(&pool, barangay, "Aling Nena Store").await;
    let permit: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO permits (barangay_id, business_id, permit_number, permit_type, status)
        VALUES ($1, $2, 'BP-2024-00001', 'new', 'rejected')
        RETURNING id
        "#,
    )
    .bind(barangay)
    .bind(business)
    .fetch_one(&pool)
    .await
    .expect("permit");
    let admin = insert_user(&pool, Role::BarangayAdmin, Some(barangay)).await;

    let state = state_with_pool(pool.clone(), config_with(&[]));
    let token = token_for(&state, admin);

    let (status, _) = send(
        router(state),
        Method::DELETE,
        &format!("/api/permits/{permit}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stored_status(&pool, "permits", permit).await, "rejected");
}
