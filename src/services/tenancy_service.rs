// src/services/tenancy_service.rs

use crate::{
    common::{error::AppError, lifecycle::ensure_transition, pagination::Page},
    db::BarangayRepository,
    models::{
        auth::Principal,
        tenancy::{
            Barangay, BarangayQuery, BarangayStatus, BarangaySummary, CreateBarangayPayload,
            UpdateBarangayPayload,
        },
    },
    policy::{scope::stamp_barangay, TenantScope},
};

/// Barangay a new row is written to: the caller's own, or the requested one
/// for a super admin. It must exist and be active.
pub(crate) async fn stamp_active_barangay(
    repo: &BarangayRepository,
    principal: &Principal,
    requested: Option<i64>,
) -> Result<i64, AppError> {
    let barangay_id = stamp_barangay(principal, requested)?;

    let barangay = repo
        .find_by_id(barangay_id)
        .await?
        .ok_or(AppError::NotFound("Barangay"))?;

    if barangay.status != BarangayStatus::Active {
        return Err(AppError::BadRequest("Barangay is inactive".to_string()));
    }
    Ok(barangay.id)
}

#[derive(Clone)]
pub struct BarangayService {
    repo: BarangayRepository,
}

impl BarangayService {
    pub fn new(repo: BarangayRepository) -> Self {
        Self { repo }
    }

    pub async fn list_public(&self) -> Result<Vec<BarangaySummary>, AppError> {
        self.repo.list_public().await
    }

    pub async fn list(&self, scope: &TenantScope, query: &BarangayQuery) -> Result<Page<Barangay>, AppError> {
        self.repo.list(scope, query).await
    }

    pub async fn get(&self, scope: &TenantScope, id: i64) -> Result<Barangay, AppError> {
        self.repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Barangay"))
    }

    pub async fn create(&self, payload: &CreateBarangayPayload) -> Result<Barangay, AppError> {
        let barangay = self.repo.create(payload).await?;
        tracing::info!(barangay_id = barangay.id, name = %barangay.name, "Barangay created");
        Ok(barangay)
    }

    /// Barangay admins maintain their own barangay's details; switching it
    /// on or off is left to super admins.
    pub async fn update(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        payload: &UpdateBarangayPayload,
    ) -> Result<Barangay, AppError> {
        let current = self.get(scope, id).await?;

        if let Some(status) = payload.status {
            if !principal.is_super_admin() && status != current.status {
                return Err(AppError::AccessDenied);
            }
            ensure_transition(current.status, status)?;
        }

        self.repo.update(current.id, payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Barangay"));
        }
        tracing::warn!(barangay_id = id, "Barangay deleted with all of its records");
        Ok(())
    }
}
