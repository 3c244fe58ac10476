// src/db/permit_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::permit::{CreatePermitPayload, Permit, PermitQuery, PermitStatus, UpdatePermitPayload},
    policy::TenantScope,
};

#[derive(Clone)]
pub struct PermitRepository {
    pool: PgPool,
}

impl PermitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &PermitQuery) -> Result<Page<Permit>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "permits", "created_at DESC, id DESC", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(business_id) = query.business_id {
                qb.push(" AND business_id = ").push_bind(business_id);
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND permit_number ILIKE ").push_bind(pattern.clone());
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Permit>, AppError> {
        fetch_scoped(&self.pool, "permits", scope, id).await
    }

    /// Raw insert; the caller owns code allocation and retries, so the sqlx
    /// error is handed back untouched.
    pub async fn insert(
        &self,
        barangay_id: i64,
        permit_number: String,
        payload: &CreatePermitPayload,
    ) -> Result<Permit, sqlx::Error> {
        sqlx::query_as::<_, Permit>(
            r#"
            INSERT INTO permits (
                barangay_id, business_id, permit_number, permit_type, fee,
                valid_from, valid_until, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.business_id)
        .bind(permit_number)
        .bind(payload.permit_type.trim())
        .bind(payload.fee)
        .bind(payload.valid_from)
        .bind(payload.valid_until)
        .bind(&payload.remarks)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, current: &Permit, changes: &UpdatePermitPayload) -> Result<Permit, AppError> {
        let permit = sqlx::query_as::<_, Permit>(
            r#"
            UPDATE permits SET
                permit_type = COALESCE($3, permit_type),
                fee = COALESCE($4, fee),
                valid_from = COALESCE($5, valid_from),
                valid_until = COALESCE($6, valid_until),
                remarks = COALESCE($7, remarks),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.permit_type.as_deref().map(str::trim))
        .bind(changes.fee)
        .bind(changes.valid_from)
        .bind(changes.valid_until)
        .bind(&changes.remarks)
        .fetch_one(&self.pool)
        .await?;
        Ok(permit)
    }

    /// `approval` carries the approver and the issue instant when the permit
    /// is being approved; other transitions leave both columns alone.
    pub async fn set_status(
        &self,
        current: &Permit,
        status: PermitStatus,
        remarks: Option<&str>,
        approval: Option<(i64, DateTime<Utc>)>,
    ) -> Result<Permit, AppError> {
        let permit = sqlx::query_as::<_, Permit>(
            r#"
            UPDATE permits SET
                status = $3,
                remarks = COALESCE($4, remarks),
                approved_by = COALESCE($5, approved_by),
                issued_at = COALESCE($6, issued_at),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(status)
        .bind(remarks)
        .bind(approval.map(|(approver, _)| approver))
        .bind(approval.map(|(_, at)| at))
        .fetch_one(&self.pool)
        .await?;
        Ok(permit)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<PermitStatus>(&self.pool, "permits", scope, id, "Permit").await
    }
}
