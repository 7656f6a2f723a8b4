use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::domain::ports::{AuthRepository, BookingRepository, CabinRepository, EmailService, UserRepository};
use crate::domain::services::{
    auth_service::{hash_password, AuthService},
    notifier::{build_templates, Notifier},
    password_reset::PasswordResetService,
    slot_service::SlotService,
};
use crate::error::AppError;
use crate::infra::cache::memory_token_store::MemoryTokenStore;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_cabin_repo::PostgresCabinRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_cabin_repo::SqliteCabinRepo, sqlite_user_repo::SqliteUserRepo,
};

/// Storage adapters for one backend.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub cabins: Arc<dyn CabinRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    pub fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
            cabins: Arc::new(SqliteCabinRepo::new(pool.clone())),
            bookings: Arc::new(SqliteBookingRepo::new(pool.clone())),
            auth: Arc::new(SqliteAuthRepo::new(pool.clone())),
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            cabins: Arc::new(PostgresCabinRepo::new(pool.clone())),
            bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
            auth: Arc::new(PostgresAuthRepo::new(pool.clone())),
        }
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service: Arc<dyn EmailService> = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Repositories::postgres(&pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Repositories::sqlite(&pool)
    };

    let state = assemble_state(config, repos, email_service);

    if let Err(e) = ensure_bootstrap_admin(&state).await {
        warn!("Bootstrap admin could not be created: {}", e);
    }

    state
}

/// Wires services on top of the given adapters. Shared by the server and the test harness.
pub fn assemble_state(config: &Config, repos: Repositories, email_service: Arc<dyn EmailService>) -> AppState {
    let templates = Arc::new(build_templates().expect("Failed to load mail templates"));
    let notifier = Arc::new(Notifier::new(
        email_service.clone(),
        templates,
        config.admin_email_list.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(repos.auth.clone(), config.clone()));
    let slot_service = Arc::new(SlotService::new(
        repos.bookings.clone(),
        repos.cabins.clone(),
        repos.users.clone(),
        notifier.clone(),
    ));
    let password_reset = Arc::new(PasswordResetService::new(
        repos.users.clone(),
        Arc::new(MemoryTokenStore::new()),
        notifier.clone(),
        config.frontend_url.clone(),
        Duration::from_secs(config.password_reset_ttl_secs),
    ));

    AppState {
        config: config.clone(),
        user_repo: repos.users,
        cabin_repo: repos.cabins,
        booking_repo: repos.bookings,
        auth_repo: repos.auth,
        email_service,
        auth_service,
        slot_service,
        password_reset,
        notifier,
    }
}

/// Creates the configured superuser if no account holds that username yet.
pub async fn ensure_bootstrap_admin(state: &AppState) -> Result<(), AppError> {
    let Some(admin) = &state.config.bootstrap_admin else {
        return Ok(());
    };

    if state.user_repo.find_by_username(&admin.username).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let user = User::new_superuser(admin.username.clone(), admin.email.clone(), password_hash);
    state.user_repo.create(&user).await?;
    info!(username = %admin.username, "Bootstrap superuser created");
    Ok(())
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
