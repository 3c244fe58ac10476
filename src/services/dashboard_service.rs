// src/services/dashboard_service.rs

use crate::{
    common::error::AppError, db::DashboardRepository, models::dashboard::DashboardStats,
    policy::TenantScope,
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    /// Counters of one barangay, or of the whole system for an unrestricted
    /// super admin.
    pub async fn get_stats(&self, scope: &TenantScope) -> Result<DashboardStats, AppError> {
        self.repo.get_stats(scope).await
    }
}
