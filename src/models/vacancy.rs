use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Vacancy {
    pub id: i32,
    pub vacancy_id: i64,
    pub employer_id: i64,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVacancy {
    pub vacancy_id: i64,
    pub employer_id: i64,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: Option<String>,
}

/// A vacancy joined with its employer's name, as shown by the reports.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VacancyListing {
    pub company_name: String,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: Option<String>,
}

const LISTING_SELECT: &str = "SELECT e.name AS company_name, v.title, v.salary_from,
        v.salary_to, v.currency, v.url
     FROM vacancies v
     JOIN employers e ON v.employer_id = e.employer_id";

impl Vacancy {
    /// Insert a vacancy unless its external id is already stored. Returns
    /// whether a row was inserted; a conflict is a no-op, so re-ingestion
    /// never refreshes an existing vacancy.
    pub async fn insert_if_absent(pool: &PgPool, input: &NewVacancy) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO vacancies
                 (vacancy_id, employer_id, title, salary_from, salary_to, currency, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (vacancy_id) DO NOTHING",
        )
        .bind(input.vacancy_id)
        .bind(input.employer_id)
        .bind(&input.title)
        .bind(input.salary_from)
        .bind(input.salary_to)
        .bind(&input.currency)
        .bind(&input.url)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    #[allow(dead_code)]
    pub async fn get_by_external_id(
        pool: &PgPool,
        vacancy_id: i64,
    ) -> Result<Option<Vacancy>, AppError> {
        let vacancy =
            sqlx::query_as::<_, Vacancy>("SELECT * FROM vacancies WHERE vacancy_id = $1")
                .bind(vacancy_id)
                .fetch_optional(pool)
                .await?;
        Ok(vacancy)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<VacancyListing>, AppError> {
        let query = format!("{LISTING_SELECT} ORDER BY e.name, v.title");
        let listings = sqlx::query_as::<_, VacancyListing>(&query)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    /// Mean of the non-null salary lower bounds. `None` when no stored
    /// vacancy has one.
    pub async fn raw_average_salary(pool: &PgPool) -> Result<Option<f64>, AppError> {
        let row: (Option<f64>,) = sqlx::query_as(
            "SELECT AVG(salary_from)::DOUBLE PRECISION FROM vacancies
             WHERE salary_from IS NOT NULL",
        )
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Average salary lower bound, with 0.0 doubling as the no-data value.
    pub async fn average_salary(pool: &PgPool) -> Result<f64, AppError> {
        Ok(Self::raw_average_salary(pool).await?.unwrap_or(0.0))
    }

    /// Vacancies whose salary lower bound is strictly above the current
    /// average. Empty when no salary data is stored at all, rather than
    /// comparing every row against a meaningless threshold.
    pub async fn list_above_average_salary(
        pool: &PgPool,
    ) -> Result<Vec<VacancyListing>, AppError> {
        let Some(average) = Self::raw_average_salary(pool).await? else {
            return Ok(Vec::new());
        };

        let query = format!("{LISTING_SELECT} WHERE v.salary_from > $1 ORDER BY e.name, v.title");
        let listings = sqlx::query_as::<_, VacancyListing>(&query)
            .bind(average)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    /// Case-insensitive substring match on the title.
    pub async fn search_by_title(
        pool: &PgPool,
        keyword: &str,
    ) -> Result<Vec<VacancyListing>, AppError> {
        let query = format!(
            "{LISTING_SELECT} WHERE v.title ILIKE '%' || $1 || '%' ORDER BY e.name, v.title"
        );
        let listings = sqlx::query_as::<_, VacancyListing>(&query)
            .bind(keyword)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    #[allow(dead_code)]
    pub async fn count_for_employer(pool: &PgPool, employer_id: i64) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vacancies WHERE employer_id = $1")
            .bind(employer_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
