use sqlx::PgPool;

use crate::models::employer::{Employer, NewEmployer};
use crate::models::vacancy::{NewVacancy, Vacancy};
use crate::sources::{EmployerRecord, ListingSource, VacancyRecord};

/// Counters reported at the end of an ingestion run.
#[derive(Debug, Default, PartialEq)]
pub struct IngestSummary {
    pub employers_loaded: usize,
    pub employers_skipped: usize,
    pub vacancies_found: usize,
    pub vacancies_inserted: usize,
}

/// Load the given employers and their vacancies into the store, strictly
/// in list order.
///
/// Failures never abort the run: an employer that cannot be fetched or
/// stored is skipped whole, and a vacancy that cannot be stored is skipped
/// on its own while the rest of its employer's list continues. There is no
/// rollback of an employer whose vacancy list fails partway through.
pub async fn ingest(
    pool: &PgPool,
    source: &dyn ListingSource,
    employer_ids: &[i64],
) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for &employer_id in employer_ids {
        let record = match source.employer(employer_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("Employer {employer_id} not found, skipping");
                summary.employers_skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::error!("Failed to fetch employer {employer_id}: {e}, skipping");
                summary.employers_skipped += 1;
                continue;
            }
        };

        let name = record.name.clone();
        if let Err(e) = Employer::upsert(pool, &to_new_employer(record)).await {
            tracing::error!("Failed to store employer '{name}': {e}, skipping");
            summary.employers_skipped += 1;
            continue;
        }
        summary.employers_loaded += 1;
        tracing::info!("Stored employer '{name}'");

        let vacancies = match source.vacancies_by_employer(employer_id).await {
            Ok(vacancies) => vacancies,
            Err(e) => {
                // The employer row stays; only its vacancies are missing
                // until the next run.
                tracing::error!("Failed to fetch vacancies for '{name}': {e}");
                continue;
            }
        };

        summary.vacancies_found += vacancies.len();
        let mut inserted = 0usize;
        for vacancy in vacancies {
            let vacancy_id = vacancy.id;
            match Vacancy::insert_if_absent(pool, &to_new_vacancy(vacancy, employer_id)).await {
                Ok(true) => inserted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Failed to store vacancy {vacancy_id} for '{name}': {e}");
                }
            }
        }
        summary.vacancies_inserted += inserted;
        tracing::info!("Stored {inserted} new vacancies for '{name}'");
    }

    tracing::info!(
        "Ingestion finished: {} employers loaded, {} skipped, {} vacancies found, {} new",
        summary.employers_loaded,
        summary.employers_skipped,
        summary.vacancies_found,
        summary.vacancies_inserted
    );
    summary
}

fn to_new_employer(record: EmployerRecord) -> NewEmployer {
    NewEmployer {
        employer_id: record.id,
        name: record.name,
        url: record.url,
        open_vacancies: record.open_vacancies,
    }
}

fn to_new_vacancy(record: VacancyRecord, employer_id: i64) -> NewVacancy {
    NewVacancy {
        vacancy_id: record.id,
        employer_id,
        title: record.title,
        salary_from: record.salary_from,
        salary_to: record.salary_to,
        currency: record.currency,
        url: record.url,
    }
}
