// src/config.rs

use std::{env, net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AnnouncementRepository, BarangayRepository, BusinessRepository, DashboardRepository,
        DocumentRepository, EventRepository, HouseholdRepository, IncidentRepository,
        OfficialRepository, PermitRepository, ResidentRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        business_service::BusinessService,
        community_service::CommunityService,
        dashboard_service::DashboardService,
        document_service::DocumentService,
        incident_service::IncidentService,
        notification::{LogNotifier, Notifier},
        resident_service::ResidentService,
        tenancy_service::BarangayService,
        user_service::UserService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 60;
const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;
/// Philippine Standard Time.
const DEFAULT_RECORDS_UTC_OFFSET: &str = "+08:00";

// ---
// 1. Settings read from the environment
// ---
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    /// Wall clock used for the year in sequence codes.
    pub records_utc_offset: chrono::FixedOffset,
}

impl AppConfig {
    /// Loads `.env` (when present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let access_minutes: i64 = parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?;
        let refresh_days: i64 = parse_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", DEFAULT_REFRESH_TTL_DAYS)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR.parse::<SocketAddr>()?)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            access_token_ttl: chrono::Duration::minutes(access_minutes),
            refresh_token_ttl: chrono::Duration::days(refresh_days),
            records_utc_offset: parse_or(
                &lookup,
                "RECORDS_UTC_OFFSET",
                DEFAULT_RECORDS_UTC_OFFSET.parse::<chrono::FixedOffset>()?,
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

// ---
// 2. Shared state handed to every handler
// ---
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub barangay_service: BarangayService,
    pub resident_service: ResidentService,
    pub business_service: BusinessService,
    pub document_service: DocumentService,
    pub incident_service: IncidentService,
    pub community_service: CommunityService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("could not connect to the database")?;

        tracing::info!("✅ Database connection established");

        Ok(Self::with_pool(db_pool, config, Arc::new(LogNotifier)))
    }

    /// Builds the dependency graph on an existing pool.
    pub fn with_pool(db_pool: PgPool, config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let barangay_repo = BarangayRepository::new(db_pool.clone());
        let resident_repo = ResidentRepository::new(db_pool.clone());
        let household_repo = HouseholdRepository::new(db_pool.clone());
        let business_repo = BusinessRepository::new(db_pool.clone());
        let permit_repo = PermitRepository::new(db_pool.clone());
        let document_repo = DocumentRepository::new(db_pool.clone());
        let incident_repo = IncidentRepository::new(db_pool.clone());
        let official_repo = OfficialRepository::new(db_pool.clone());
        let announcement_repo = AnnouncementRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            barangay_repo.clone(),
            notifier.clone(),
            &config,
        );
        let user_service = UserService::new(user_repo, barangay_repo.clone(), notifier.clone());
        let barangay_service = BarangayService::new(barangay_repo.clone());
        let resident_service = ResidentService::new(
            resident_repo.clone(),
            household_repo,
            barangay_repo.clone(),
            db_pool.clone(),
        );
        let business_service = BusinessService::new(
            business_repo,
            permit_repo,
            barangay_repo.clone(),
            db_pool.clone(),
            config.records_utc_offset,
        );
        let document_service = DocumentService::new(
            document_repo,
            resident_repo,
            barangay_repo.clone(),
            notifier,
            db_pool.clone(),
            config.records_utc_offset,
        );
        let incident_service = IncidentService::new(
            incident_repo,
            barangay_repo.clone(),
            db_pool.clone(),
            config.records_utc_offset,
        );
        let community_service = CommunityService::new(
            official_repo,
            announcement_repo,
            event_repo,
            barangay_repo,
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            user_service,
            barangay_service,
            resident_service,
            business_service,
            document_service,
            incident_service,
            community_service,
            dashboard_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/barangay"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.access_token_ttl, chrono::Duration::minutes(60));
        assert_eq!(config.refresh_token_ttl, chrono::Duration::days(7));
        assert_eq!(config.records_utc_offset.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn records_offset_can_be_overridden() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/barangay"),
            ("JWT_SECRET", "secret"),
            ("RECORDS_UTC_OFFSET", "+00:00"),
        ]))
        .unwrap();
        assert_eq!(config.records_utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/barangay")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/barangay"),
            ("JWT_SECRET", "secret"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]))
        .err()
        .unwrap();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
