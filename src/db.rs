use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};

use crate::config::Config;
use crate::error::AppError;

/// Create the application database if it does not exist yet.
///
/// Connects to the administrative `postgres` database and checks
/// `pg_database` by name. This is a privileged bootstrap path that only
/// matters on a fresh host; steady-state startups find the database
/// already present and do nothing.
pub async fn ensure_database_exists(config: &Config) -> Result<(), AppError> {
    let mut conn = PgConnection::connect_with(&config.admin_connect_options()).await?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.db_name)
        .fetch_optional(&mut conn)
        .await?;

    if exists.is_none() {
        // CREATE DATABASE does not accept bound parameters; the name comes
        // from configuration and is quoted as an identifier.
        let stmt = format!(
            "CREATE DATABASE \"{}\"",
            config.db_name.replace('"', "\"\"")
        );
        sqlx::query(&stmt).execute(&mut conn).await?;
        tracing::info!("Created database '{}'", config.db_name);
    }

    conn.close().await?;
    Ok(())
}

/// Connect to the application database.
///
/// Ingestion and reads are strictly sequential, so a single pooled
/// connection held for the process lifetime is enough.
pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(config.connect_options())
        .await?;
    Ok(pool)
}

/// Create both tables if they do not exist. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS employers (
            id SERIAL PRIMARY KEY,
            employer_id BIGINT UNIQUE NOT NULL,
            name VARCHAR(255) NOT NULL,
            url VARCHAR(255),
            open_vacancies INT,
            loaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS vacancies (
            id SERIAL PRIMARY KEY,
            vacancy_id BIGINT UNIQUE NOT NULL,
            employer_id BIGINT NOT NULL
                REFERENCES employers (employer_id) ON DELETE CASCADE,
            title VARCHAR(255) NOT NULL,
            salary_from INT,
            salary_to INT,
            currency VARCHAR(10),
            url VARCHAR(255),
            loaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
