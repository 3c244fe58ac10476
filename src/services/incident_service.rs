// src/services/incident_service.rs

use chrono::FixedOffset;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::belongs_to_barangay, error::AppError, lifecycle::ensure_transition,
        pagination::Page,
    },
    db::{BarangayRepository, IncidentRepository},
    models::{
        auth::Principal,
        incident::{CreateIncidentPayload, Incident, IncidentQuery, UpdateIncidentPayload},
    },
    policy::{
        sequence::{insert_with_code, INCIDENT_PREFIX},
        CodeRequest, CodeSeries, TenantScope,
    },
    services::tenancy_service::stamp_active_barangay,
};

#[derive(Clone)]
pub struct IncidentService {
    repo: IncidentRepository,
    barangay_repo: BarangayRepository,
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl IncidentService {
    pub fn new(
        repo: IncidentRepository,
        barangay_repo: BarangayRepository,
        pool: PgPool,
        utc_offset: FixedOffset,
    ) -> Self {
        Self { repo, barangay_repo, pool, utc_offset }
    }

    async fn ensure_party(&self, barangay_id: i64, resident_id: Option<i64>) -> Result<(), AppError> {
        if let Some(resident_id) = resident_id {
            if !belongs_to_barangay(&self.pool, "residents", barangay_id, resident_id).await? {
                return Err(AppError::NotFound("Resident"));
            }
        }
        Ok(())
    }

    pub async fn list(&self, scope: &TenantScope, query: &IncidentQuery) -> Result<Page<Incident>, AppError> {
        self.repo.list(scope, query).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Incident, AppError> {
        self.repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Incident"))
    }

    /// Records a blotter entry under a fresh `BLT-<year>-<n>` number.
    pub async fn create(&self, principal: &Principal, payload: &CreateIncidentPayload) -> Result<Incident, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        self.ensure_party(barangay_id, payload.complainant_resident_id).await?;
        self.ensure_party(barangay_id, payload.respondent_resident_id).await?;

        let request =
            CodeRequest::current(barangay_id, CodeSeries::Incident, INCIDENT_PREFIX, self.utc_offset);
        let repo = &self.repo;
        let recorded_by = principal.id;
        let incident = insert_with_code(&self.pool, &request, move |code| {
            repo.insert(barangay_id, code, recorded_by, payload)
        })
        .await?;

        tracing::info!(incident_id = incident.id, blotter_number = %incident.blotter_number, "Incident recorded");
        Ok(incident)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateIncidentPayload,
    ) -> Result<Incident, AppError> {
        let current = self.get(scope, id).await?;
        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }
        self.ensure_party(current.barangay_id, changes.respondent_resident_id).await?;

        self.repo.update(&current, changes).await
    }

    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.repo.retire(scope, id).await?;
        tracing::info!(incident_id = id, "Incident archived");
        Ok(())
    }
}
