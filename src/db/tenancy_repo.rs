// src/db/tenancy_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        db_utils::{conflict_on_unique, search_pattern},
        error::AppError,
        pagination::{Page, PageRequest},
    },
    models::tenancy::{
        Barangay, BarangayQuery, BarangayStatus, BarangaySummary, CreateBarangayPayload,
        UpdateBarangayPayload,
    },
    policy::TenantScope,
};

const DUPLICATE_BARANGAY: &str = "A barangay with this name already exists in this municipality";

#[derive(Clone)]
pub struct BarangayRepository {
    pool: PgPool,
}

impl BarangayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // A barangay *is* the tenant, so the scope applies to its own `id`.
    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, scope: &TenantScope, query: &BarangayQuery) {
        scope.push_clause(qb, "id");
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(pattern) = search_pattern(query.search.as_deref()) {
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR municipality ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR province ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    pub async fn list(&self, scope: &TenantScope, query: &BarangayQuery) -> Result<Page<Barangay>, AppError> {
        let page = PageRequest::new(query.page, query.limit);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM barangays WHERE TRUE");
        Self::push_filters(&mut count, scope, query);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM barangays WHERE TRUE");
        Self::push_filters(&mut select, scope, query);
        select
            .push(" ORDER BY name, municipality LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items = select.build_query_as::<Barangay>().fetch_all(&self.pool).await?;

        Ok(Page {
            items,
            pagination: page.describe(total),
        })
    }

    /// Active barangays offered on the registration form.
    pub async fn list_public(&self) -> Result<Vec<BarangaySummary>, AppError> {
        let rows = sqlx::query_as::<_, BarangaySummary>(
            r#"
            SELECT id, name, municipality, province
            FROM barangays
            WHERE status = $1
            ORDER BY name
            "#,
        )
        .bind(BarangayStatus::Active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Barangay>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM barangays WHERE id = ");
        qb.push_bind(id);
        scope.push_clause(&mut qb, "id");
        Ok(qb.build_query_as::<Barangay>().fetch_optional(&self.pool).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Barangay>, AppError> {
        self.find(&TenantScope::Unrestricted, id).await
    }

    pub async fn create(&self, payload: &CreateBarangayPayload) -> Result<Barangay, AppError> {
        sqlx::query_as::<_, Barangay>(
            r#"
            INSERT INTO barangays (name, municipality, province, zip_code, contact_number, email, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.municipality.trim())
        .bind(payload.province.trim())
        .bind(&payload.zip_code)
        .bind(&payload.contact_number)
        .bind(&payload.email)
        .bind(&payload.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_BARANGAY))
    }

    pub async fn update(&self, id: i64, changes: &UpdateBarangayPayload) -> Result<Barangay, AppError> {
        sqlx::query_as::<_, Barangay>(
            r#"
            UPDATE barangays SET
                name = COALESCE($2, name),
                municipality = COALESCE($3, municipality),
                province = COALESCE($4, province),
                zip_code = COALESCE($5, zip_code),
                contact_number = COALESCE($6, contact_number),
                email = COALESCE($7, email),
                address = COALESCE($8, address),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref().map(str::trim))
        .bind(changes.municipality.as_deref().map(str::trim))
        .bind(changes.province.as_deref().map(str::trim))
        .bind(&changes.zip_code)
        .bind(&changes.contact_number)
        .bind(&changes.email)
        .bind(&changes.address)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_BARANGAY))
    }

    /// Hard delete; every child row goes with it (`ON DELETE CASCADE`).
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM barangays WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
