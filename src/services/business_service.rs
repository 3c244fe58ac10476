// src/services/business_service.rs
//
// Businesses and their permits.

use chrono::{FixedOffset, Utc};
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::belongs_to_barangay, error::AppError, lifecycle::ensure_transition,
        pagination::Page,
    },
    db::{BarangayRepository, BusinessRepository, PermitRepository},
    models::{
        auth::Principal,
        business::{Business, BusinessQuery, BusinessStatus, CreateBusinessPayload, UpdateBusinessPayload},
        permit::{
            CreatePermitPayload, Permit, PermitQuery, PermitStatus, UpdatePermitPayload,
            UpdatePermitStatusPayload,
        },
    },
    policy::{
        sequence::{insert_with_code, PERMIT_PREFIX},
        CodeRequest, CodeSeries, TenantScope,
    },
    services::tenancy_service::stamp_active_barangay,
};

#[derive(Clone)]
pub struct BusinessService {
    business_repo: BusinessRepository,
    permit_repo: PermitRepository,
    barangay_repo: BarangayRepository,
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl BusinessService {
    pub fn new(
        business_repo: BusinessRepository,
        permit_repo: PermitRepository,
        barangay_repo: BarangayRepository,
        pool: PgPool,
        utc_offset: FixedOffset,
    ) -> Self {
        Self { business_repo, permit_repo, barangay_repo, pool, utc_offset }
    }

    // ---
    // Businesses
    // ---
    pub async fn list_businesses(&self, scope: &TenantScope, query: &BusinessQuery) -> Result<Page<Business>, AppError> {
        self.business_repo.list(scope, query).await
    }

    pub async fn get_business(&self, scope: &TenantScope, id: i64) -> Result<Business, AppError> {
        self.business_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Business"))
    }

    pub async fn create_business(
        &self,
        principal: &Principal,
        payload: &CreateBusinessPayload,
    ) -> Result<Business, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        if let Some(owner_id) = payload.owner_resident_id {
            if !belongs_to_barangay(&self.pool, "residents", barangay_id, owner_id).await? {
                return Err(AppError::NotFound("Resident"));
            }
        }

        let business = self.business_repo.create(barangay_id, payload).await?;
        tracing::info!(business_id = business.id, barangay_id, "Business registered");
        Ok(business)
    }

    pub async fn update_business(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateBusinessPayload,
    ) -> Result<Business, AppError> {
        let current = self.get_business(scope, id).await?;
        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }
        self.business_repo.update(&current, changes).await
    }

    pub async fn delete_business(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.business_repo.retire(scope, id).await?;
        tracing::info!(business_id = id, "Business closed");
        Ok(())
    }

    // ---
    // Permits
    // ---
    pub async fn list_permits(&self, scope: &TenantScope, query: &PermitQuery) -> Result<Page<Permit>, AppError> {
        self.permit_repo.list(scope, query).await
    }

    pub async fn get_permit(&self, scope: &TenantScope, id: i64) -> Result<Permit, AppError> {
        self.permit_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Permit"))
    }

    /// Issues a `BP-<year>-<n>` number for a business of the same barangay.
    pub async fn create_permit(
        &self,
        principal: &Principal,
        payload: &CreatePermitPayload,
    ) -> Result<Permit, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;

        let business = self.get_business(&TenantScope::Barangay(barangay_id), payload.business_id).await?;
        if business.status == BusinessStatus::Closed {
            return Err(AppError::BadRequest(
                "Cannot issue a permit for a closed business".to_string(),
            ));
        }

        let request =
            CodeRequest::current(barangay_id, CodeSeries::Permit, PERMIT_PREFIX, self.utc_offset);
        let repo = &self.permit_repo;
        let permit = insert_with_code(&self.pool, &request, move |code| {
            repo.insert(barangay_id, code, payload)
        })
        .await?;

        tracing::info!(permit_id = permit.id, permit_number = %permit.permit_number, "Permit created");
        Ok(permit)
    }

    pub async fn update_permit(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdatePermitPayload,
    ) -> Result<Permit, AppError> {
        let current = self.get_permit(scope, id).await?;
        if current.status != PermitStatus::Pending {
            return Err(AppError::BadRequest(
                "Only pending permits can be edited".to_string(),
            ));
        }
        self.permit_repo.update(&current, changes).await
    }

    /// Approval stamps who approved the permit and when it was issued.
    pub async fn update_permit_status(
        &self,
        principal: &Principal,
        scope: &TenantScope,
        id: i64,
        payload: &UpdatePermitStatusPayload,
    ) -> Result<Permit, AppError> {
        let current = self.get_permit(scope, id).await?;
        ensure_transition(current.status, payload.status)?;

        let approval = (payload.status == PermitStatus::Approved && current.status != PermitStatus::Approved)
            .then(|| (principal.id, Utc::now()));

        let permit = self
            .permit_repo
            .set_status(&current, payload.status, payload.remarks.as_deref(), approval)
            .await?;

        tracing::info!(
            permit_id = permit.id,
            from = ?current.status,
            to = ?permit.status,
            by = principal.id,
            "Permit status changed"
        );
        Ok(permit)
    }

    pub async fn delete_permit(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.permit_repo.retire(scope, id).await?;
        tracing::info!(permit_id = id, "Permit revoked");
        Ok(())
    }
}
