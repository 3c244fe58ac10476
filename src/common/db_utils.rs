use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    policy::TenantScope,
};

/// Name of the unique constraint a database error violated, if any.
pub(crate) fn violated_unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Turns a unique-key violation into a readable `Conflict`; everything else
/// stays a database error.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    if violated_unique_constraint(&err).is_some() {
        return AppError::Conflict(message.to_string());
    }
    err.into()
}

/// `%term%` for ILIKE filters; blank search terms are ignored.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

/// Row `id` of `table`, provided it is visible through `scope`.
pub(crate) async fn fetch_scoped<T>(
    pool: &PgPool,
    table: &str,
    scope: &TenantScope,
    id: i64,
) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {table} WHERE id = "));
    qb.push_bind(id);
    scope.push_clause(&mut qb, "barangay_id");

    Ok(qb.build_query_as::<T>().fetch_optional(pool).await?)
}

/// Whether row `id` of `table` belongs to `barangay_id`. Used to check
/// references (household, resident, business) before writing them.
pub(crate) async fn belongs_to_barangay(
    pool: &PgPool,
    table: &str,
    barangay_id: i64,
    id: i64,
) -> Result<bool, AppError> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1 AND barangay_id = $2)");
    let exists = sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .bind(barangay_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Runs the count and the page query of a list endpoint with the same
/// filters. `filters` appends ` AND ...` clauses to an open WHERE.
pub(crate) async fn fetch_page<T, F>(
    pool: &PgPool,
    table: &str,
    order_by: &str,
    page: PageRequest,
    filters: F,
) -> Result<Page<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    F: Fn(&mut QueryBuilder<'_, Postgres>),
{
    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {table} WHERE TRUE"));
    filters(&mut count);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {table} WHERE TRUE"));
    filters(&mut select);
    select
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page {
        items,
        pagination: page.describe(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some(" dela cruz ")).as_deref(), Some("%dela cruz%"));
    }
}
