// src/common/lifecycle.rs

use std::fmt::Debug;

use sqlx::{Decode, Encode, PgPool, Postgres, QueryBuilder, Type};

use crate::{common::error::AppError, policy::TenantScope};

/// Status enum of an entity that is soft-deleted instead of removed.
///
/// `DELETE` moves a row into `RETIRED`; default listings hide every state in
/// `HIDDEN` unless the caller filters by status explicitly.
pub trait Lifecycle:
    Copy + PartialEq + Debug + Send + Sync + 'static + for<'q> Encode<'q, Postgres> + Type<Postgres>
{
    const RETIRED: Self;
    const HIDDEN: &'static [Self];

    fn label(self) -> &'static str;

    /// Transition table of the entity. Staying in the same state is always fine.
    fn can_transition_to(self, next: Self) -> bool;
}

pub fn ensure_transition<L: Lifecycle>(from: L, to: L) -> Result<(), AppError> {
    if from == to || from.can_transition_to(to) {
        return Ok(());
    }
    Err(AppError::BadRequest(format!(
        "Cannot change status from {} to {}",
        from.label(),
        to.label()
    )))
}

/// Appends the status filter of a list query.
pub fn push_visibility<L: Lifecycle>(qb: &mut QueryBuilder<'_, Postgres>, requested: Option<L>) {
    if let Some(status) = requested {
        qb.push(" AND status = ").push_bind(status);
        return;
    }
    if L::HIDDEN.is_empty() {
        return;
    }
    qb.push(" AND status NOT IN (");
    let mut hidden = qb.separated(", ");
    for state in L::HIDDEN {
        hidden.push_bind(*state);
    }
    hidden.push_unseparated(")");
}

/// Moves a scoped row into its retired state. Absent and out-of-scope rows
/// are both reported as `NotFound(entity)`; a row whose current status may
/// not move to `RETIRED` is a bad request.
pub async fn retire<L>(
    pool: &PgPool,
    table: &'static str,
    scope: &TenantScope,
    id: i64,
    entity: &'static str,
) -> Result<(), AppError>
where
    L: Lifecycle + for<'r> Decode<'r, Postgres> + Unpin,
{
    let mut select = QueryBuilder::<Postgres>::new("SELECT status FROM ");
    select.push(table).push(" WHERE id = ").push_bind(id);
    scope.push_clause(&mut select, "barangay_id");

    let current = select
        .build_query_scalar::<L>()
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound(entity))?;
    ensure_transition(current, L::RETIRED)?;

    // Only from the status checked above.
    let mut update = QueryBuilder::<Postgres>::new("UPDATE ");
    update
        .push(table)
        .push(" SET status = ")
        .push_bind(L::RETIRED)
        .push(", updated_at = NOW() WHERE id = ")
        .push_bind(id)
        .push(" AND status = ")
        .push_bind(current);
    scope.push_clause(&mut update, "barangay_id");

    let result = update.build().execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::BadRequest(format!(
            "{entity} status changed, try again"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resident::ResidentStatus;

    #[test]
    fn same_state_is_a_no_op() {
        assert!(ensure_transition(ResidentStatus::Deceased, ResidentStatus::Deceased).is_ok());
    }

    #[test]
    fn illegal_transition_is_a_bad_request() {
        let err = ensure_transition(ResidentStatus::Deceased, ResidentStatus::Active).unwrap_err();
        match err {
            AppError::BadRequest(message) => {
                assert_eq!(message, "Cannot change status from deceased to active")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    fn may_retire<L: Lifecycle>(from: L) -> bool {
        ensure_transition(from, L::RETIRED).is_ok()
    }

    #[test]
    fn retiring_follows_each_transition_table() {
        use crate::models::{
            document::DocumentStatus, event::EventStatus, incident::IncidentStatus,
            permit::PermitStatus,
        };

        assert!(may_retire(DocumentStatus::Pending));
        assert!(may_retire(DocumentStatus::Rejected));
        assert!(!may_retire(DocumentStatus::Released));

        assert!(may_retire(EventStatus::Upcoming));
        assert!(!may_retire(EventStatus::Completed));

        assert!(may_retire(PermitStatus::Approved));
        assert!(!may_retire(PermitStatus::Rejected));
        assert!(!may_retire(PermitStatus::Expired));

        assert!(may_retire(IncidentStatus::Closed));
        assert!(may_retire(ResidentStatus::Inactive));
        assert!(!may_retire(ResidentStatus::Deceased));
        assert!(!may_retire(ResidentStatus::MovedOut));
    }

    #[test]
    fn default_listing_hides_retired_states() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM residents WHERE TRUE");
        push_visibility::<ResidentStatus>(&mut qb, None);
        assert_eq!(qb.sql(), "SELECT * FROM residents WHERE TRUE AND status NOT IN ($1)");
    }

    #[test]
    fn explicit_status_filter_wins() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM residents WHERE TRUE");
        push_visibility(&mut qb, Some(ResidentStatus::Inactive));
        assert_eq!(qb.sql(), "SELECT * FROM residents WHERE TRUE AND status = $1");
    }
}
