// src/db/incident_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{fetch_page, fetch_scoped, search_pattern},
        error::AppError,
        lifecycle::{push_visibility, retire},
        pagination::{Page, PageRequest},
    },
    models::incident::{CreateIncidentPayload, Incident, IncidentQuery, IncidentStatus, UpdateIncidentPayload},
    policy::TenantScope,
};

#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, scope: &TenantScope, query: &IncidentQuery) -> Result<Page<Incident>, AppError> {
        let page = PageRequest::new(query.page, query.limit);
        let pattern = search_pattern(query.search.as_deref());

        fetch_page(&self.pool, "incidents", "incident_date DESC, id DESC", page, |qb| {
            scope.push_clause(qb, "barangay_id");
            push_visibility(qb, query.status);
            if let Some(incident_type) = query.incident_type.as_deref() {
                qb.push(" AND incident_type = ").push_bind(incident_type.to_string());
            }
            if let Some(pattern) = &pattern {
                qb.push(" AND (blotter_number ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR complainant_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR respondent_name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(")");
            }
        })
        .await
    }

    pub async fn find(&self, scope: &TenantScope, id: i64) -> Result<Option<Incident>, AppError> {
        fetch_scoped(&self.pool, "incidents", scope, id).await
    }

    pub async fn insert(
        &self,
        barangay_id: i64,
        blotter_number: String,
        recorded_by: i64,
        payload: &CreateIncidentPayload,
    ) -> Result<Incident, sqlx::Error> {
        sqlx::query_as::<_, Incident>(
            r#"
            INSERT INTO incidents (
                barangay_id, blotter_number, incident_type, incident_date, location, description,
                complainant_name, complainant_resident_id, respondent_name, respondent_resident_id,
                recorded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(barangay_id)
        .bind(blotter_number)
        .bind(payload.incident_type.trim())
        .bind(payload.incident_date)
        .bind(payload.location.trim())
        .bind(&payload.description)
        .bind(payload.complainant_name.trim())
        .bind(payload.complainant_resident_id)
        .bind(&payload.respondent_name)
        .bind(payload.respondent_resident_id)
        .bind(recorded_by)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, current: &Incident, changes: &UpdateIncidentPayload) -> Result<Incident, AppError> {
        let incident = sqlx::query_as::<_, Incident>(
            r#"
            UPDATE incidents SET
                incident_type = COALESCE($3, incident_type),
                incident_date = COALESCE($4, incident_date),
                location = COALESCE($5, location),
                description = COALESCE($6, description),
                respondent_name = COALESCE($7, respondent_name),
                respondent_resident_id = COALESCE($8, respondent_resident_id),
                resolution = COALESCE($9, resolution),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1 AND barangay_id = $2
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(current.barangay_id)
        .bind(&changes.incident_type)
        .bind(changes.incident_date)
        .bind(&changes.location)
        .bind(&changes.description)
        .bind(&changes.respondent_name)
        .bind(changes.respondent_resident_id)
        .bind(&changes.resolution)
        .bind(changes.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(incident)
    }

    pub async fn retire(&self, scope: &TenantScope, id: i64) -> Result<(), AppError> {
        retire::<IncidentStatus>(&self.pool, "incidents", scope, id, "Incident").await
    }
}
