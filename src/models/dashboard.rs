// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Cards on top of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DashboardStats {
    pub active_residents: i64,
    pub households: i64,
    pub active_businesses: i64,
    pub pending_documents: i64,
    pub pending_permits: i64,
    pub open_incidents: i64,
    pub active_officials: i64,
    pub upcoming_events: i64,
}
