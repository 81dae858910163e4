// Remote listing sources.
// Defines the trait and record types for job-listing providers.

pub mod hh;

use async_trait::async_trait;

use crate::error::AppError;

/// An employer as returned by the remote API, normalized to the fields
/// the store keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployerRecord {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub open_vacancies: i32,
}

/// A single job posting belonging to one employer.
#[derive(Debug, Clone, PartialEq)]
pub struct VacancyRecord {
    pub id: i64,
    pub title: String,
    pub salary_from: Option<i32>,
    pub salary_to: Option<i32>,
    pub currency: Option<String>,
    pub url: Option<String>,
}

/// Trait the ingestion pipeline drives. The hh.ru client implements it;
/// tests substitute a scripted source.
///
/// All operations are read-only and idempotent on the remote system.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one employer by id. `Ok(None)` means the employer does not
    /// exist; transport and server failures surface as errors so callers
    /// can tell a miss from a failed fetch.
    async fn employer(&self, id: i64) -> Result<Option<EmployerRecord>, AppError>;

    /// Fetch all vacancies of an employer, paging until exhausted.
    async fn vacancies_by_employer(
        &self,
        employer_id: i64,
    ) -> Result<Vec<VacancyRecord>, AppError>;

    /// Single-page employer text search.
    async fn search_employers(&self, text: &str) -> Result<Vec<EmployerRecord>, AppError>;
}
