// src/db/household_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{conflict_on_unique, fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        pagination::{Page, PageRequest},
    },
    models::household::{CreateHouseholdPayload, Household, HouseholdQuery, UpdateHouseholdPayload},
    policy::TenantScope,
};

const DUPLICATE_NUMBER: &str = "Household number already exists";

#[derive(Clone)]
pub struct HouseholdRepository {
    pool: PgPool,
}

impl HouseholdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &HouseholdQuery) -> Result<Page<Household>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "households", "household_number", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            if let Some(purok) = query.purok.as_deref() {
                qb.push(" AND purok = ").push_bind(purok.to_string());
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (household_number ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR address ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Household>, AppError> {
        fetch_scoped(&self.pool, "households", scope, id).await
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        barangay_id: i64,
        payload: &CreateHouseholdPayload,
    ) -> Result<Household, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO households (barangay_id, household_number, address, purok, head_resident_id, monthly_income)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(payload.household_number.trim())
        .bind(payload.address.trim())
        .bind(&payload.purok)
        .bind(payload.head_resident_id)
        .bind(payload.monthly_income)
        .fetch_one(executor)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NUMBER))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        current: &Household,
        changes: &UpdateHouseholdPayload,
    ) -> Result<Household, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Household>(
            r#"
            UPDATE households SET
                household_number = COALESCE($3, household_number),
                address = COALESCE($4, address),
                purok = COALESCE($5, purok),
                head_resident_id = CASE WHEN $6 THEN $7 ELSE head_resident_id END,
                monthly_income = COALESCE($8, monthly_income),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(changes.household_number.as_deref().map(str::trim))
        .bind(changes.address.as_deref().map(str::trim))
        .bind(&changes.purok)
        .bind(changes.head_resident_id.is_some())
        .bind(changes.head_resident_id.flatten())
        .bind(changes.monthly_income)
        .fetch_one(executor)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NUMBER))
    }

    /// Links the head resident to the household they lead.
    pub async fn attach_member<'e, E>(&self, executor: E, household_id: i64, resident_id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE residents SET household_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(household_id)
            .bind(resident_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Hard delete; members keep their record with `household_id` cleared.
    pub async fn delete(&self, scope: &TenantScope, id: i64) -> Result<bool, AppError> {
        let mut qb = sqlx::QueryBuilder::<Postgres>::new("DELETE FROM households WHERE id = ");
        qb.push_bind(id);
        scope.push_clause(&mut qb, "barangay_id");
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
