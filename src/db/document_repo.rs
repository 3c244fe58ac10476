// src/db/document_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::document::{
        CreateDocumentPayload, Document, DocumentQuery, DocumentStatus, UpdateDocumentPayload,
    },
    policy::TenantScope,
};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &DocumentQuery) -> Result<Page<Document>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "documents", "created_at DESC, id DESC", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(resident_id) = query.resident_id {
                qb.push(" AND resident_id = ").push_bind(resident_id);
            }
            if let Some(document_type) = query.document_type {
                qb.push(" AND document_type = ").push_bind(document_type);
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (control_number ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR purpose ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Document>, AppError> {
        fetch_scoped(&self.pool, "documents", scope, id).await
    }

    pub async fn insert(
        &self,
        barangay_id: i64,
        control_number: String,
        payload: &CreateDocumentPayload,
    ) -> Result<Document, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (barangay_id, resident_id, document_type, control_number, purpose, fee, remarks)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.resident_id)
        .bind(payload.document_type)
        .bind(control_number)
        .bind(payload.purpose.trim())
        .bind(payload.fee)
        .bind(&payload.remarks)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, current: &Document, changes: &UpdateDocumentPayload) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents SET
                purpose = COALESCE($3, purpose),
                fee = COALESCE($4, fee),
                remarks = COALESCE($5, remarks),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.purpose.as_deref().map(str::trim))
        .bind(changes.fee)
        .bind(&changes.remarks)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    /// `release` carries the issuing user and instant for `released`.
    pub async fn set_status(
        &self,
        current: &Document,
        status: DocumentStatus,
        remarks: Option<&str>,
        release: Option<(i64, DateTime<Utc>)>,
    ) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents SET
                status = $3,
                remarks = COALESCE($4, remarks),
                issued_by = COALESCE($5, issued_by),
                released_at = COALESCE($6, released_at),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(status)
        .bind(remarks)
        .bind(release.map(|(issuer, _)| issuer))
        .bind(release.map(|(_, at)| at))
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<DocumentStatus>(&self.pool, "documents", scope, id, "Document").await
    }
}
