use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::services::auth_service::AuthService;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_establishment_repo::PostgresEstablishmentRepo,
    postgres_offer_repo::PostgresOfferRepo, postgres_partner_repo::PostgresPartnerRepo,
    postgres_stats_repo::PostgresStatsRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_establishment_repo::SqliteEstablishmentRepo,
    sqlite_offer_repo::SqliteOfferRepo, sqlite_partner_repo::SqlitePartnerRepo,
    sqlite_stats_repo::SqliteStatsRepo,
};

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse()?;
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone())?);

        Ok(AppState {
            config: config.clone(),
            partner_repo: Arc::new(PostgresPartnerRepo::new(pool.clone())),
            auth_repo,
            establishment_repo: Arc::new(PostgresEstablishmentRepo::new(pool.clone())),
            offer_repo: Arc::new(PostgresOfferRepo::new(pool.clone())),
            stats_repo: Arc::new(PostgresStatsRepo::new(pool.clone())),
            auth_service,
        })
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone())?);

        Ok(AppState {
            config: config.clone(),
            partner_repo: Arc::new(SqlitePartnerRepo::new(pool.clone())),
            auth_repo,
            establishment_repo: Arc::new(SqliteEstablishmentRepo::new(pool.clone())),
            offer_repo: Arc::new(SqliteOfferRepo::new(pool.clone())),
            stats_repo: Arc::new(SqliteStatsRepo::new(pool.clone())),
            auth_service,
        })
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
