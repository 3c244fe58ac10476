// src/services/resident_service.rs
//
// Residents and the households they belong to.

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::belongs_to_barangay, error::AppError, lifecycle::ensure_transition,
        pagination::Page,
    },
    db::{BarangayRepository, HouseholdRepository, ResidentRepository},
    models::{
        auth::Principal,
        household::{
            CreateHouseholdPayload, Household, HouseholdDetail, HouseholdQuery,
            UpdateHouseholdPayload,
        },
        resident::{CreateResidentPayload, Resident, ResidentQuery, UpdateResidentPayload},
    },
    policy::TenantScope,
    services::tenancy_service::stamp_active_barangay,
};

#[derive(Clone)]
pub struct ResidentService {
    resident_repo: ResidentRepository,
    household_repo: HouseholdRepository,
    barangay_repo: BarangayRepository,
    pool: PgPool,
}

impl ResidentService {
    pub fn new(
        resident_repo: ResidentRepository,
        household_repo: HouseholdRepository,
        barangay_repo: BarangayRepository,
        pool: PgPool,
    ) -> Self {
        Self { resident_repo, household_repo, barangay_repo, pool }
    }

    // A reference to a row of another barangay is treated like a missing row.
    async fn ensure_household(&self, barangay_id: i64, household_id: i64) -> Result<(), AppError> {
        if !belongs_to_barangay(&self.pool, "households", barangay_id, household_id).await? {
            return Err(AppError::NotFound("Household"));
        }
        Ok(())
    }

    async fn ensure_resident(&self, barangay_id: i64, resident_id: i64) -> Result<(), AppError> {
        if !belongs_to_barangay(&self.pool, "residents", barangay_id, resident_id).await? {
            return Err(AppError::NotFound("Resident"));
        }
        Ok(())
    }

    // ---
    // Residents
    // ---
    pub async fn list_residents(&self, scope: &TenantScope, query: &ResidentQuery) -> Result<Page<Resident>, AppError> {
        self.resident_repo.list(scope, query).await
    }

    pub async fn get_resident(&self, scope: &TenantScope, id: i64) -> Result<Resident, AppError> {
        self.resident_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Resident"))
    }

    pub async fn create_resident(
        &self,
        principal: &Principal,
        payload: &CreateResidentPayload,
    ) -> Result<Resident, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        if let Some(household_id) = payload.household_id {
            self.ensure_household(barangay_id, household_id).await?;
        }

        let resident = self.resident_repo.create(barangay_id, payload).await?;
        tracing::info!(resident_id = resident.id, barangay_id, "Resident registered");
        Ok(resident)
    }

    pub async fn update_resident(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateResidentPayload,
    ) -> Result<Resident, AppError> {
        let current = self.get_resident(scope, id).await?;

        if let Some(status) = changes.status {
            ensure_transition(current.status, status)?;
        }
        if let Some(Some(household_id)) = changes.household_id {
            self.ensure_household(current.barangay_id, household_id).await?;
        }

        self.resident_repo.update(&current, changes).await
    }

    pub async fn delete_resident(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        self.resident_repo.retire(scope, id).await?;
        tracing::info!(resident_id = id, "Resident marked inactive");
        Ok(())
    }

    // ---
    // Households
    // ---
    pub async fn list_households(&self, scope: &TenantScope, query: &HouseholdQuery) -> Result<Page<Household>, AppError> {
        self.household_repo.list(scope, query).await
    }

    async fn find_household(&self, scope: &TenantScope, id: i64) -> Result<Household, AppError> {
        self.household_repo
            .find(scope, id)
            .await?
            .ok_or(AppError::NotFound("Household"))
    }

    pub async fn get_household(&self, scope: &TenantScope, id: i64) -> Result<HouseholdDetail, AppError> {
        let household = self.find_household(scope, id).await?;
        let members = self.resident_repo.members_of(household.id).await?;
        Ok(HouseholdDetail { household, members })
    }

    /// The head of household becomes a member in the same transaction.
    pub async fn create_household(
        &self,
        principal: &Principal,
        payload: &CreateHouseholdPayload,
    ) -> Result<Household, AppError> {
        let barangay_id = stamp_active_barangay(&self.barangay_repo, principal, payload.barangay_id).await?;
        if let Some(head_id) = payload.head_resident_id {
            self.ensure_resident(barangay_id, head_id).await?;
        }

        let mut tx = self.pool.begin().await?;
        let household = self.household_repo.create(&mut *tx, barangay_id, payload).await?;
        if let Some(head_id) = household.head_resident_id {
            self.household_repo.attach_member(&mut *tx, household.id, head_id).await?;
        }
        tx.commit().await?;

        tracing::info!(household_id = household.id, barangay_id, "Household created");
        Ok(household)
    }

    pub async fn update_household(
        &self,
        scope: &TenantScope,
        id: i64,
        changes: &UpdateHouseholdPayload,
    ) -> Result<Household, AppError> {
        let current = self.find_household(scope, id).await?;
        if let Some(Some(head_id)) = changes.head_resident_id {
            self.ensure_resident(current.barangay_id, head_id).await?;
        }

        let mut tx = self.pool.begin().await?;
        let household = self.household_repo.update(&mut *tx, &current, changes).await?;
        if let Some(Some(head_id)) = changes.head_resident_id {
            self.household_repo.attach_member(&mut *tx, household.id, head_id).await?;
        }
        tx.commit().await?;

        Ok(household)
    }

    pub async fn delete_household(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        if !self.household_repo.delete(scope, id).await? {
            return Err(AppError::NotFound("Household"));
        }
        tracing::info!(household_id = id, "Household deleted");
        Ok(())
    }
}
