// src/db/resident_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::resident::{
        CivilStatus, CreateResidentPayload, Resident, ResidentQuery, ResidentStatus,
        UpdateResidentPayload,
    },
    policy::TenantScope,
};

#[derive(Clone)]
pub struct ResidentRepository {
    pool: PgPool,
}

impl ResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &ResidentQuery) -> Result<Page<Resident>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "residents", "last_name, first_name, id", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(household_id) = query.household_id {
                qb.push(" AND household_id = ").push_bind(household_id);
            }
            if let Some(gender) = query.gender {
                qb.push(" AND gender = ").push_bind(gender);
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (first_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR middle_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR last_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Resident>, AppError> {
        fetch_scoped(&self.pool, "residents", scope, id).await
    }

    /// Members of a household, retired residents included.
    pub async fn members_of(&self, household_id: i64) -> Result<Vec<Resident>, AppError> {
        let rows = sqlx::query_as::<_, Resident>(
            "SELECT * FROM residents WHERE household_id = $1 ORDER BY last_name, first_name",
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, barangay_id: i64, payload: &CreateResidentPayload) -> Result<Resident, AppError> {
        let resident = sqlx::query_as::<_, Resident>(
            r#"
            INSERT INTO residents (
                barangay_id, household_id, first_name, middle_name, last_name, suffix,
                birth_date, gender, civil_status, contact_number, email, address,
                occupation, is_voter, is_pwd
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.household_id)
        .bind(payload.first_name.trim())
        .bind(&payload.middle_name)
        .bind(payload.last_name.trim())
        .bind(&payload.suffix)
        .bind(payload.birth_date)
        .bind(payload.gender)
        .bind(payload.civil_status.unwrap_or(CivilStatus::Single))
        .bind(&payload.contact_number)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.occupation)
        .bind(payload.is_voter)
        .bind(payload.is_pwd)
        .fetch_one(&self.pool)
        .await?;
        Ok(resident)
    }

    /// Absent fields keep their stored value; `household_id: null` clears it.
    pub async fn update(&self, current: &Resident, changes: &UpdateResidentPayload) -> Result<Resident, AppError> {
        let resident = sqlx::query_as::<_, Resident>(
            r#"
            UPDATE residents SET
                household_id = CASE WHEN $3 THEN $4 ELSE household_id END,
                first_name = COALESCE($5, first_name),
                middle_name = COALESCE($6, middle_name),
                last_name = COALESCE($7, last_name),
                suffix = COALESCE($8, suffix),
                birth_date = COALESCE($9, birth_date),
                gender = COALESCE($10, gender),
                civil_status = COALESCE($11, civil_status),
                contact_number = COALESCE($12, contact_number),
                email = COALESCE($13, email),
                address = COALESCE($14, address),
                occupation = COALESCE($15, occupation),
                is_voter = COALESCE($16, is_voter),
                is_pwd = COALESCE($17, is_pwd),
                status = COALESCE($18, status),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.household_id.is_some())
        .bind(changes.household_id.flatten())
        .bind(changes.first_name.as_deref().map(str::trim))
        .bind(&changes.middle_name)
        .bind(changes.last_name.as_deref().map(str::trim))
        .bind(&changes.suffix)
        .bind(changes.birth_date)
        .bind(changes.gender)
        .bind(changes.civil_status)
        .bind(&changes.contact_number)
        .bind(&changes.email)
        .bind(&changes.address)
        .bind(&changes.occupation)
        .bind(changes.is_voter)
        .bind(changes.is_pwd)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Resident"))?;
        Ok(resident)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<ResidentStatus>(&self.pool, "residents", scope, id, "Resident").await
    }
}
