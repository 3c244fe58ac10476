// src/db/official_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::official::{CreateOfficialPayload, Official, OfficialQuery, OfficialStatus, UpdateOfficialPayload},
    policy::TenantScope,
};

#[derive(Clone)]
pub struct OfficialRepository {
    pool: PgPool,
}

impl OfficialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &OfficialQuery) -> Result<Page<Official>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "officials", "term_start DESC, full_name", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(position) = query.position.as_deref() {
                qb.push(" AND position = ").push_bind(position.to_string());
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (full_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR committee ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Official>, AppError> {
        fetch_scoped(&self.pool, "officials", scope, id).await
    }

    pub async fn create(&self, barangay_id: i64, payload: &CreateOfficialPayload) -> Result<Official, AppError> {
        let official = sqlx::query_as::<_, Official>(
            r#"
            INSERT INTO officials (
                barangay_id, resident_id, full_name, position, committee,
                term_start, term_end, contact_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.resident_id)
        .bind(payload.full_name.trim())
        .bind(payload.position.trim())
        .bind(&payload.committee)
        .bind(payload.term_start)
        .bind(payload.term_end)
        .bind(&payload.contact_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(official)
    }

    pub async fn update(&self, current: &Official, changes: &UpdateOfficialPayload) -> Result<Official, AppError> {
        let official = sqlx::query_as::<_, Official>(
            r#"
            UPDATE officials SET
                full_name = COALESCE($3, full_name),
                position = COALESCE($4, position),
                committee = COALESCE($5, committee),
                term_start = COALESCE($6, term_start),
                term_end = COALESCE($7, term_end),
                contact_number = COALESCE($8, contact_number),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.full_name.as_deref().map(str::trim))
        .bind(changes.position.as_deref().map(str::trim))
        .bind(&changes.committee)
        .bind(changes.term_start)
        .bind(changes.term_end)
        .bind(&changes.contact_number)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(official)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<OfficialStatus>(&self.pool, "officials", scope, id, "Official").await
    }
}
