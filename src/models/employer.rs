use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Employer {
    pub id: i32,
    pub employer_id: i64,
    pub name: String,
    pub url: Option<String>,
    pub open_vacancies: Option<i32>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployer {
    pub employer_id: i64,
    pub name: String,
    pub url: Option<String>,
    pub open_vacancies: i32,
}

/// One row of the companies report: employer name and how many of its
/// vacancies are stored.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CompanyVacancyCount {
    pub name: String,
    pub vacancy_count: i64,
}

impl Employer {
    /// Insert an employer or, if the external id is already stored,
    /// overwrite its name, URL and open-vacancy count.
    pub async fn upsert(pool: &PgPool, input: &NewEmployer) -> Result<Employer, AppError> {
        let employer = sqlx::query_as::<_, Employer>(
            "INSERT INTO employers (employer_id, name, url, open_vacancies)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (employer_id) DO UPDATE
             SET name = EXCLUDED.name,
                 url = EXCLUDED.url,
                 open_vacancies = EXCLUDED.open_vacancies
             RETURNING *",
        )
        .bind(input.employer_id)
        .bind(&input.name)
        .bind(&input.url)
        .bind(input.open_vacancies)
        .fetch_one(pool)
        .await?;
        Ok(employer)
    }

    #[allow(dead_code)]
    pub async fn get_by_external_id(
        pool: &PgPool,
        employer_id: i64,
    ) -> Result<Option<Employer>, AppError> {
        let employer =
            sqlx::query_as::<_, Employer>("SELECT * FROM employers WHERE employer_id = $1")
                .bind(employer_id)
                .fetch_optional(pool)
                .await?;
        Ok(employer)
    }

    /// All employers with their stored vacancy counts, most vacancies
    /// first. The outer join keeps employers with zero vacancies in the
    /// listing.
    pub async fn list_with_vacancy_counts(
        pool: &PgPool,
    ) -> Result<Vec<CompanyVacancyCount>, AppError> {
        let counts = sqlx::query_as::<_, CompanyVacancyCount>(
            "SELECT e.name, COUNT(v.id) AS vacancy_count
             FROM employers e
             LEFT JOIN vacancies v ON e.employer_id = v.employer_id
             GROUP BY e.name
             ORDER BY vacancy_count DESC, e.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(counts)
    }

    /// Administrative removal; vacancies go with the employer via the
    /// cascade on the foreign key.
    #[allow(dead_code)]
    pub async fn delete_by_external_id(pool: &PgPool, employer_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM employers WHERE employer_id = $1")
            .bind(employer_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vacancy::Vacancy;
    use crate::testutil;

    #[tokio::test]
    #[ignore = "needs Postgres; run with --ignored --test-threads=1"]
    async fn upsert_overwrites_on_natural_key_conflict() {
        let pool = testutil::test_pool().await;

        let mut input = testutil::employer(1455, "Acme");
        Employer::upsert(&pool, &input).await.unwrap();

        input.name = "Acme Holdings".to_string();
        input.open_vacancies = 7;
        Employer::upsert(&pool, &input).await.unwrap();

        let stored = Employer::get_by_external_id(&pool, 1455)
            .await
            .unwrap()
            .expect("employer row");
        assert_eq!(stored.name, "Acme Holdings");
        assert_eq!(stored.open_vacancies, Some(7));

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 1, "re-ingestion must not duplicate the employer");
    }

    #[tokio::test]
    #[ignore = "needs Postgres; run with --ignored --test-threads=1"]
    async fn counts_listing_keeps_zero_vacancy_employers() {
        let pool = testutil::test_pool().await;

        Employer::upsert(&pool, &testutil::employer(1, "Busy"))
            .await
            .unwrap();
        Employer::upsert(&pool, &testutil::employer(2, "Quiet"))
            .await
            .unwrap();
        for n in 0..3 {
            Vacancy::insert_if_absent(&pool, &testutil::vacancy(100 + n, 1, "Engineer", None))
                .await
                .unwrap();
        }

        let counts = Employer::list_with_vacancy_counts(&pool).await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].name, "Busy");
        assert_eq!(counts[0].vacancy_count, 3);
        assert_eq!(counts[1].name, "Quiet");
        assert_eq!(counts[1].vacancy_count, 0);
    }

    #[tokio::test]
    #[ignore = "needs Postgres; run with --ignored --test-threads=1"]
    async fn deleting_an_employer_cascades_to_its_vacancies() {
        let pool = testutil::test_pool().await;

        Employer::upsert(&pool, &testutil::employer(1, "Acme"))
            .await
            .unwrap();
        Vacancy::insert_if_absent(&pool, &testutil::vacancy(10, 1, "Engineer", None))
            .await
            .unwrap();

        Employer::delete_by_external_id(&pool, 1).await.unwrap();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vacancies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }
}
