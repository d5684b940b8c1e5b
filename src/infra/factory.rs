use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use argon2::{password_hash::{PasswordHasher, SaltString}, Argon2};
use rand::rngs::OsRng;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tera::Tera;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::models::user::{NewUserParams, Role, User};
use crate::domain::services::auth_service::AuthService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_issue_repo::PostgresIssueRepo,
    postgres_occupancy_repo::PostgresOccupancyRepo, postgres_payment_repo::PostgresPaymentRepo,
    postgres_room_repo::PostgresRoomRepo, postgres_user_repo::PostgresUserRepo,
    postgres_verification_repo::PostgresVerificationRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_issue_repo::SqliteIssueRepo,
    sqlite_occupancy_repo::SqliteOccupancyRepo, sqlite_payment_repo::SqlitePaymentRepo,
    sqlite_room_repo::SqliteRoomRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_verification_repo::SqliteVerificationRepo,
};
use crate::state::AppState;

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("verification.html", include_str!("../templates/verification.html"))
        .expect("Failed to load verification template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let templates = Arc::new(load_templates());

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
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

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            room_repo: Arc::new(PostgresRoomRepo::new(pool.clone())),
            occupancy_repo: Arc::new(PostgresOccupancyRepo::new(pool.clone())),
            payment_repo: Arc::new(PostgresPaymentRepo::new(pool.clone())),
            issue_repo: Arc::new(PostgresIssueRepo::new(pool.clone())),
            verification_repo: Arc::new(PostgresVerificationRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
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

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            room_repo: Arc::new(SqliteRoomRepo::new(pool.clone())),
            occupancy_repo: Arc::new(SqliteOccupancyRepo::new(pool.clone())),
            payment_repo: Arc::new(SqlitePaymentRepo::new(pool.clone())),
            issue_repo: Arc::new(SqliteIssueRepo::new(pool.clone())),
            verification_repo: Arc::new(SqliteVerificationRepo::new(pool.clone())),
            auth_repo,
            auth_service,
            email_service,
            templates,
        }
    };

    seed_admin(&state).await;
    state
}

/// First-boot bootstrap: without at least one admin nobody can create rooms
/// or staff accounts, so one is seeded from config when missing.
async fn seed_admin(state: &AppState) {
    let existing = state.user_repo
        .find_by_username(&state.config.admin_username)
        .await
        .expect("Failed to query admin user");

    if existing.is_some() {
        return;
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(state.config.admin_password.as_bytes(), &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let admin = User::new(NewUserParams {
        username: state.config.admin_username.clone(),
        email: format!("{}@hostel.local", state.config.admin_username),
        password_hash,
        role: Role::Admin,
        phone: None,
        address: None,
        email_verified: true,
    });

    state.user_repo.create(&admin).await.expect("Failed to seed admin user");
    info!("Seeded admin account: {}", admin.username);
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
