// src/db/business_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{conflict_on_unique, fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::business::{Business, BusinessQuery, BusinessStatus, CreateBusinessPayload, UpdateBusinessPayload},
    policy::TenantScope,
};

const DUPLICATE_NAME: &str = "A business with this name already exists";

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &BusinessQuery) -> Result<Page<Business>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "businesses", "name", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(business_type) = query.business_type.as_deref() {
                qb.push(" AND business_type = ").push_bind(business_type.to_string());
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR owner_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Business>, AppError> {
        fetch_scoped(&self.pool, "businesses", scope, id).await
    }

    pub async fn create(&self, barangay_id: i64, payload: &CreateBusinessPayload) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"
            INSERT INTO businesses (
                barangay_id, name, business_type, owner_name, owner_resident_id,
                address, contact_number, email, capital
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.name.trim())
        .bind(payload.business_type.trim())
        .bind(payload.owner_name.trim())
        .bind(payload.owner_resident_id)
        .bind(payload.address.trim())
        .bind(&payload.contact_number)
        .bind(&payload.email)
        .bind(payload.capital)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))
    }

    pub async fn update(&self, current: &Business, changes: &UpdateBusinessPayload) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses SET
                name = COALESCE($3, name),
                business_type = COALESCE($4, business_type),
                owner_name = COALESCE($5, owner_name),
                address = COALESCE($6, address),
                contact_number = COALESCE($7, contact_number),
                email = COALESCE($8, email),
                capital = COALESCE($9, capital),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(&changes.business_type)
        .bind(&changes.owner_name)
        .bind(&changes.address)
        .bind(&changes.contact_number)
        .bind(&changes.email)
        .bind(changes.capital)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<BusinessStatus>(&self.pool, "businesses", scope, id, "Business").await
    }
}
