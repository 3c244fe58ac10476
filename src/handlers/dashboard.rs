// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    common::error::AppError, config::AppState, middleware::tenancy::TenantContext,
    models::dashboard::DashboardStats,
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    params(
        ("barangay_id" = Option<i64>, Query, description = "Super admins only: narrow the totals to one barangay")
    ),
    responses(
        (status = 200, description = "Record counters of the caller's barangay", body = DashboardStats),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Residents have no dashboard")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.get_stats(&tenant.scope).await?;
    Ok(Json(json!({ "stats": stats })))
}
