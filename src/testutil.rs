//! Helpers for the database-backed tests.
//!
//! These tests are `#[ignore]`d because they need a running Postgres.
//! Point TEST_DATABASE_URL (or DATABASE_URL) at a scratch database and
//! run them with:
//!
//! ```text
//! cargo test -- --ignored --test-threads=1
//! ```
//!
//! The helper wipes both tables, so the tests assume exclusive access to
//! the database and must not run in parallel.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::models::employer::NewEmployer;
use crate::models::vacancy::NewVacancy;

pub async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("set TEST_DATABASE_URL to run database tests");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("failed to connect to the test database");
    crate::db::init_schema(&pool)
        .await
        .expect("failed to create the schema");
    sqlx::query("TRUNCATE vacancies, employers RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("failed to wipe the tables");
    pool
}

pub fn employer(employer_id: i64, name: &str) -> NewEmployer {
    NewEmployer {
        employer_id,
        name: name.to_string(),
        url: Some(format!("https://hh.ru/employer/{employer_id}")),
        open_vacancies: 0,
    }
}

pub fn vacancy(
    vacancy_id: i64,
    employer_id: i64,
    title: &str,
    salary_from: Option<i32>,
) -> NewVacancy {
    NewVacancy {
        vacancy_id,
        employer_id,
        title: title.to_string(),
        salary_from,
        salary_to: None,
        currency: salary_from.map(|_| "RUR".to_string()),
        url: Some(format!("https://hh.ru/vacancy/{vacancy_id}")),
    }
}
