// src/policy/sequence.rs

use std::future::Future;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use sqlx::{Executor, PgPool, Postgres};

use crate::common::{db_utils::violated_unique_constraint, error::AppError};

pub const PERMIT_PREFIX: &str = "BP";
pub const INCIDENT_PREFIX: &str = "BLT";
const FALLBACK_DOCUMENT_PREFIX: &str = "DOC";

/// How many fresh numbers we try before giving up on an insert.
pub const CODE_ATTEMPTS: usize = 5;

/// A family of display codes, each numbered independently per barangay and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSeries {
    Document,
    Permit,
    Incident,
}

impl CodeSeries {
    /// Key stored in `sequence_counters.series`; also the owning table.
    pub fn table(self) -> &'static str {
        match self {
            CodeSeries::Document => "documents",
            CodeSeries::Permit => "permits",
            CodeSeries::Incident => "incidents",
        }
    }

    /// Unique `(barangay_id, code)` constraint of the owning table.
    pub fn constraint(self) -> &'static str {
        match self {
            CodeSeries::Document => "documents_code_key",
            CodeSeries::Permit => "permits_code_key",
            CodeSeries::Incident => "incidents_code_key",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CodeSeries::Document => "control",
            CodeSeries::Permit => "permit",
            CodeSeries::Incident => "blotter",
        }
    }
}

/// First three letters of the document type, upper-cased
/// (`barangay_clearance` -> `BAR`).
pub fn document_prefix(document_type: &str) -> String {
    let prefix: String = document_type
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        FALLBACK_DOCUMENT_PREFIX.to_string()
    } else {
        prefix
    }
}

pub fn format_code(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{prefix}-{year}-{sequence:05}")
}

/// Calendar year of `at` on the barangay's wall clock.
pub fn local_year(at: DateTime<Utc>, utc_offset: FixedOffset) -> i32 {
    at.with_timezone(&utc_offset).year()
}

/// `[Jan 1 of year, Jan 1 of year + 1)` on the barangay's wall clock.
pub fn year_window(
    year: i32,
    utc_offset: FixedOffset,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    let start = utc_offset.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = utc_offset.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start.with_timezone(&Utc), end.with_timezone(&Utc))),
        _ => Err(anyhow::anyhow!("year {year} is out of range").into()),
    }
}

/// What to number and where.
#[derive(Debug, Clone)]
pub struct CodeRequest {
    pub barangay_id: i64,
    pub series: CodeSeries,
    pub prefix: String,
    pub year: i32,
    pub utc_offset: FixedOffset,
}

impl CodeRequest {
    /// Numbered under the current local year.
    pub fn current(
        barangay_id: i64,
        series: CodeSeries,
        prefix: impl Into<String>,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            barangay_id,
            series,
            prefix: prefix.into(),
            year: local_year(Utc::now(), utc_offset),
            utc_offset,
        }
    }
}

/// Bumps the counter of `(barangay, series, year)` and returns the new value.
///
/// The first call of a year seeds the counter from the rows already created
/// in that year, so numbering continues where existing data left off. The
/// upsert holds the counter row lock until it completes, so concurrent
/// callers always observe distinct values.
pub async fn next_sequence<'e, E>(
    executor: E,
    barangay_id: i64,
    series: CodeSeries,
    year: i32,
    utc_offset: FixedOffset,
) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let (start, end) = year_window(year, utc_offset)?;

    let sql = format!(
        r#"
        INSERT INTO sequence_counters (barangay_id, series, year, last_value)
        VALUES (
            $1, $2, $3,
            (
                SELECT COUNT(*) FROM {table}
                WHERE barangay_id = $1 AND created_at >= $4 AND created_at < $5
            ) + 1
        )
        ON CONFLICT (barangay_id, series, year)
        DO UPDATE SET last_value = sequence_counters.last_value + 1
        RETURNING last_value
        "#,
        table = series.table()
    );

    let value = sqlx::query_scalar::<_, i64>(&sql)
        .bind(barangay_id)
        .bind(series.table())
        .bind(year)
        .bind(start)
        .bind(end)
        .fetch_one(executor)
        .await?;

    Ok(value)
}

/// Allocates a code and hands it to `insert`. When the insert trips the
/// series' unique code constraint (rows imported with hand-written numbers),
/// a new number is allocated and the insert retried.
pub async fn insert_with_code<T, F, Fut>(
    pool: &PgPool,
    request: &CodeRequest,
    mut insert: F,
) -> Result<T, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let constraint = request.series.constraint();

    for attempt in 1..=CODE_ATTEMPTS {
        let sequence = next_sequence(
            pool,
            request.barangay_id,
            request.series,
            request.year,
            request.utc_offset,
        )
        .await?;
        let code = format_code(&request.prefix, request.year, sequence);

        match insert(code.clone()).await {
            Ok(row) => return Ok(row),
            Err(e) if violated_unique_constraint(&e).as_deref() == Some(constraint) => {
                tracing::warn!(%code, attempt, "Sequence code already in use, allocating another");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Conflict(format!(
        "Could not allocate a unique {} number, please try again",
        request.series.label()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn document_prefix_takes_three_letters() {
        assert_eq!(document_prefix("barangay_clearance"), "BAR");
        assert_eq!(document_prefix("certificate_of_indigency"), "CER");
        assert_eq!(document_prefix("id"), "ID");
        assert_eq!(document_prefix("__"), "DOC");
    }

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(format_code("BAR", 2024, 1), "BAR-2024-00001");
        assert_eq!(format_code("BAR", 2024, 2), "BAR-2024-00002");
        assert_eq!(format_code(PERMIT_PREFIX, 2025, 731), "BP-2025-00731");
        assert_eq!(format_code(INCIDENT_PREFIX, 2025, 123_456), "BLT-2025-123456");
    }

    #[test]
    fn sequential_numbers_sort_in_creation_order() {
        let codes: Vec<String> = (1..=12).map(|n| format_code("BLT", 2024, n)).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    fn manila() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn year_window_is_half_open() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let (start, end) = year_window(2024, utc).unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2024, 1, 1));
        assert_eq!((end.year(), end.month(), end.day()), (2025, 1, 1));
    }

    #[test]
    fn year_window_follows_local_midnight() {
        let (start, end) = year_window(2025, manila()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 31, 16, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 12, 31, 16, 0, 0).unwrap());
    }

    #[test]
    fn new_year_morning_counts_toward_the_local_year() {
        // 02:00 on Jan 1 in Manila is still Dec 31 in UTC.
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 18, 0, 0).unwrap();
        assert_eq!(local_year(at, manila()), 2025);
        assert_eq!(local_year(at, FixedOffset::east_opt(0).unwrap()), 2024);
    }

    #[test]
    fn constraint_names_match_their_tables() {
        for series in [CodeSeries::Document, CodeSeries::Permit, CodeSeries::Incident] {
            assert!(series.constraint().starts_with(series.table()));
        }
    }
}
