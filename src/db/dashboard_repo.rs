// src/db/dashboard_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{common::error::AppError, models::dashboard::DashboardStats, policy::TenantScope};

/// `(alias, table, extra condition)` of every dashboard card.
const CARDS: &[(&str, &str, &str)] = &[
    ("active_residents", "residents", "status = 'active'"),
    ("households", "households", "TRUE"),
    ("active_businesses", "businesses", "status = 'active'"),
    ("pending_documents", "documents", "status = 'pending'"),
    ("pending_permits", "permits", "status = 'pending'"),
    ("open_incidents", "incidents", "status IN ('open', 'under_investigation')"),
    ("active_officials", "officials", "status = 'active'"),
    ("upcoming_events", "events", "status = 'upcoming' AND start_at >= NOW()"),
];

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All counters in one statement, so they come from the same snapshot.
    pub async fn get_stats(&self, scope: &TenantScope) -> Result<DashboardStats, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");

        for (i, (alias, table, condition)) in CARDS.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push("(SELECT COUNT(*) FROM ")
                .push(*table)
                .push(" WHERE ")
                .push(*condition);
            scope.push_clause(&mut qb, "barangay_id");
            qb.push(") AS ").push(*alias);
        }

        let stats = qb.build_query_as::<DashboardStats>().fetch_one(&self.pool).await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_counter_is_scoped() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        for (_, table, condition) in CARDS {
            qb.push(format!("{table} {condition}"));
            TenantScope::Barangay(3).push_clause(&mut qb, "barangay_id");
        }
        assert_eq!(qb.sql().matches("barangay_id = $").count(), CARDS.len());
    }
}
