// src/policy/scope.rs

use sqlx::{Postgres, QueryBuilder};

use crate::{common::error::AppError, models::auth::Principal};

/// Barangay filter applied to every read and write a request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Super admin without an explicit barangay: no filter at all.
    Unrestricted,
    Barangay(i64),
    /// Fail-closed filter for principals that lost their barangay.
    Nothing,
}

impl TenantScope {
    /// Only a super admin may pick the barangay; everyone else is pinned to
    /// their own, whatever the request asks for.
    pub fn resolve(principal: &Principal, requested: Option<i64>) -> Self {
        if principal.is_super_admin() {
            return requested.map_or(TenantScope::Unrestricted, TenantScope::Barangay);
        }
        principal
            .barangay_id
            .map_or(TenantScope::Nothing, TenantScope::Barangay)
    }

    /// Appends ` AND <column> = $n` (or ` AND FALSE`) to a query whose
    /// WHERE clause is already open.
    pub fn push_clause(&self, qb: &mut QueryBuilder<'_, Postgres>, column: &str) {
        match self {
            TenantScope::Unrestricted => {}
            TenantScope::Barangay(id) => {
                qb.push(" AND ").push(column).push(" = ").push_bind(*id);
            }
            TenantScope::Nothing => {
                qb.push(" AND FALSE");
            }
        }
    }

    pub fn allows(&self, barangay_id: i64) -> bool {
        match self {
            TenantScope::Unrestricted => true,
            TenantScope::Barangay(id) => *id == barangay_id,
            TenantScope::Nothing => false,
        }
    }

    pub fn barangay_id(&self) -> Option<i64> {
        match self {
            TenantScope::Barangay(id) => Some(*id),
            TenantScope::Unrestricted | TenantScope::Nothing => None,
        }
    }
}

/// Barangay to stamp on a row being created.
pub fn stamp_barangay(principal: &Principal, requested: Option<i64>) -> Result<i64, AppError> {
    if principal.is_super_admin() {
        return requested
            .or(principal.barangay_id)
            .ok_or_else(|| AppError::BadRequest("barangay_id is required".to_string()));
    }
    principal.barangay_id.ok_or(AppError::AccessDenied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn principal(role: Role, barangay_id: Option<i64>) -> Principal {
        Principal { id: 10, role, barangay_id }
    }

    #[test]
    fn staff_is_pinned_to_own_barangay() {
        let staff = principal(Role::Staff, Some(5));
        assert_eq!(TenantScope::resolve(&staff, None), TenantScope::Barangay(5));
        assert_eq!(TenantScope::resolve(&staff, Some(7)), TenantScope::Barangay(5));
    }

    #[test]
    fn barangay_admin_cannot_override() {
        let admin = principal(Role::BarangayAdmin, Some(2));
        assert_eq!(TenantScope::resolve(&admin, Some(9)), TenantScope::Barangay(2));
        assert_eq!(stamp_barangay(&admin, Some(9)).unwrap(), 2);
    }

    #[test]
    fn super_admin_is_unrestricted_unless_asking() {
        let root = principal(Role::SuperAdmin, None);
        assert_eq!(TenantScope::resolve(&root, None), TenantScope::Unrestricted);
        assert_eq!(TenantScope::resolve(&root, Some(9)), TenantScope::Barangay(9));
    }

    #[test]
    fn missing_barangay_fails_closed() {
        let orphan = principal(Role::Secretary, None);
        let scope = TenantScope::resolve(&orphan, Some(3));
        assert_eq!(scope, TenantScope::Nothing);
        assert!(!scope.allows(3));
        assert!(matches!(stamp_barangay(&orphan, Some(3)), Err(AppError::AccessDenied)));
    }

    #[test]
    fn super_admin_stamps_the_requested_barangay() {
        let root = principal(Role::SuperAdmin, None);
        assert_eq!(stamp_barangay(&root, Some(9)).unwrap(), 9);
        assert!(matches!(stamp_barangay(&root, None), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn clause_is_appended_to_open_where() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM residents WHERE id = ");
        qb.push_bind(42_i64);
        TenantScope::Barangay(5).push_clause(&mut qb, "barangay_id");
        assert_eq!(qb.sql(), "SELECT * FROM residents WHERE id = $1 AND barangay_id = $2");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM residents WHERE TRUE");
        TenantScope::Nothing.push_clause(&mut qb, "barangay_id");
        assert_eq!(qb.sql(), "SELECT * FROM residents WHERE TRUE AND FALSE");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM residents WHERE TRUE");
        TenantScope::Unrestricted.push_clause(&mut qb, "barangay_id");
        assert_eq!(qb.sql(), "SELECT * FROM residents WHERE TRUE");
    }
}
