// src/services/document_service.rs

use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        lifecycle::{ensure_transition, Lifecycle},
        pagination::Page,
    },
    db::{BarangayRepository, DocumentRepository, ResidentRepository},
    models::{
        auth::Principal,
        document::{
            CreateDocumentPayload, Document, DocumentQuery, DocumentStatus, UpdateDocumentPayload,
            UpdateDocumentStatusPayload,
        },
    },
    policy::{
        sequence::{document_prefix, insert_with_code},
        CodeRequest, CodeSeries, TenantScope,
    },
    services::{
        notification::{dispatch, Notification, Notifier},
        tenancy_service::stamp_active_barangay,
    },
};

#[derive(Clone)]
pub struct DocumentService {
    document_repo: DocumentRepository,
    resident_repo: ResidentRepository,
    barangay_repo: BarangayRepository,
    notifier: Arc<dyn Notifier>,
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl DocumentService {
    pub fn new(
        document_repo: DocumentRepository,
        resident_repo: ResidentRepository,
        barangay_repo: BarangayRepository,
        notifier: Arc<dyn Notifier>,
        pool: PgPool,
        utc_offset: FixedOffset,
    ) -> Self {
        Self { document_repo, resident_repo, barangay_repo, notifier, pool, utc_offset }
    }

    pub async fn list(&self, scope: &TenantScope, query: &DocumentQuery) -> Result<Page<Document>, AppError> {
        self.document_repo.list(scope, query).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Document, AppError> {
        self.document_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Document"))
    }

    /// Files a request for a resident of the same barangay. The control
    /// number takes its prefix from the document type (`BAR-2024-00001`),
    /// while the running number is shared by every type.
    pub async fn create(&self, principal: &Principal, payload: &CreateDocumentPayload) -> Result<Document, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;

        self.resident_repo
            .find(&TenantScope::Barangay(barangay_id), payload.resident_id)
            .await?
            .ok_or(AppError::NotFound("Resident"))?;

        let request = CodeRequest::current(
            barangay_id,
            CodeSeries::Document,
            document_prefix(payload.document_type.as_str()),
            self.utc_offset,
        );
        let repo = &self.document_repo;
        let document = insert_with_code(&self.pool, &request, move |code| {
            repo.insert(barangay_id, code, payload)
        })
        .await?;

        tracing::info!(
            document_id = document.id,
            control_number = %document.control_number,
            requested_by = principal.id,
            "Document request filed"
        );
        Ok(document)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateDocumentPayload,
    ) -> Result<Document, AppError> {
        let current = self.get(scope, id).await?;
        if matches!(current.status, DocumentStatus::Released | DocumentStatus::Cancelled) {
            return Err(AppError::BadRequest(format!(
                "A {} document can no longer be edited",
                current.status.label()
            )));
        }
        self.document_repo.update(&current, changes).await
    }

    /// Moves a request through its workflow. Release stamps the issuing
    /// official; reaching `ready` tells the resident to come by.
    pub async fn update_status(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        payload: &UpdateDocumentStatusPayload,
    ) -> Result<Document, AppError> {
        let current = self.get(scope, id).await?;
        ensure_transition(current.status, payload.status)?;

        let release = (payload.status == DocumentStatus::Released && current.status != DocumentStatus::Released)
            .then(|| (principal.id, Utc::now()));

        let document = self
            .document_repo
            .set_status(&current, payload.status, payload.remarks.as_deref(), release)
            .await?;

        if document.status == DocumentStatus::Ready && current.status != DocumentStatus::Ready {
            self.notify_ready(&document).await;
        }

        tracing::info!(
            document_id = document.id,
            from = ?current.status,
            to = ?document.status,
            by = principal.id,
            "Document status changed"
        );
        Ok(document)
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.document_repo.retire(scope, id).await?;
        tracing::info!(document_id = id, "Document request cancelled");
        Ok(())
    }

    // The status change already happened; a failed lookup only costs the email.
    async fn notify_ready(&self, document: &Document) {
        let scope = TenantScope::Barangay(document.barangay_id);
        match self.resident_repo.find(&scope, document.resident_id).await {
            Ok(Some(resident)) => {
                if let Some(email) = resident.email.filter(|e| !e.trim().is_empty()) {
                    dispatch(
                        self.notifier.clone(),
                        Notification::DocumentReady {
                            email,
                            control_number: document.control_number.clone(),
                        },
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(document_id = document.id, error = %e, "Could not look up resident for notification");
            }
        }
    }
}
