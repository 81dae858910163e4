use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::AppError;
use crate::sources::{EmployerRecord, ListingSource, VacancyRecord};

/// Vacancies are fetched in pages of this size.
pub const PAGE_SIZE: u32 = 100;

/// Hard cap on vacancy pages per employer. A loop guard against a source
/// that never returns an empty page, not a business rule; at the current
/// PAGE_SIZE it bounds one employer at 2000 records.
pub const MAX_PAGES: u32 = 20;

/// Employer search returns a single page of at most this many hits.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Client for the hh.ru public API. Used anonymously; the API only
/// requires a User-Agent header.
pub struct HhClient {
    base_url: String,
    client: reqwest::Client,
}

impl HhClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vacancydb/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GET a JSON body. `Ok(None)` on 404; any other non-success status
    /// is an error rather than a silent empty result.
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Value>, AppError> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(Some(resp.json().await?))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            Err(AppError::UnexpectedStatus {
                status,
                url: url.to_string(),
            })
        }
    }

    async fn fetch_vacancy_page(
        &self,
        employer_id: i64,
        page: u32,
    ) -> Result<Vec<VacancyRecord>, AppError> {
        let url = format!("{}/vacancies", self.base_url);
        let body = self
            .get_json(
                &url,
                &[
                    ("employer_id", employer_id.to_string()),
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(body
            .map(|b| parse_items(&b, parse_vacancy))
            .unwrap_or_default())
    }
}

#[async_trait]
impl ListingSource for HhClient {
    async fn employer(&self, id: i64) -> Result<Option<EmployerRecord>, AppError> {
        let url = format!("{}/employers/{id}", self.base_url);
        let Some(body) = self.get_json(&url, &[]).await? else {
            return Ok(None);
        };
        match parse_employer(&body) {
            Some(record) => Ok(Some(record)),
            None => {
                tracing::warn!("Employer {id} response is missing required fields");
                Ok(None)
            }
        }
    }

    async fn vacancies_by_employer(
        &self,
        employer_id: i64,
    ) -> Result<Vec<VacancyRecord>, AppError> {
        drain_pages(|page| self.fetch_vacancy_page(employer_id, page)).await
    }

    async fn search_employers(&self, text: &str) -> Result<Vec<EmployerRecord>, AppError> {
        let url = format!("{}/employers", self.base_url);
        let body = self
            .get_json(
                &url,
                &[
                    ("text", text.to_string()),
                    ("per_page", SEARCH_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(body
            .map(|b| parse_items(&b, parse_employer))
            .unwrap_or_default())
    }
}

/// Page through `fetch` starting at page 0 until a page comes back empty
/// or MAX_PAGES is reached.
async fn drain_pages<F, Fut>(mut fetch: F) -> Result<Vec<VacancyRecord>, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<VacancyRecord>, AppError>>,
{
    let mut all = Vec::new();
    for page in 0..MAX_PAGES {
        let items = fetch(page).await?;
        if items.is_empty() {
            return Ok(all);
        }
        all.extend(items);
    }
    tracing::warn!("Stopped paging after {MAX_PAGES} pages; the employer may have more vacancies");
    Ok(all)
}

/// Parse the `items` list of a paged response, skipping records that are
/// missing required fields.
fn parse_items<T>(body: &Value, parse: fn(&Value) -> Option<T>) -> Vec<T> {
    let Some(items) = body.get("items").and_then(|v| v.as_array()) else {
        tracing::warn!("Response body has no 'items' list");
        return Vec::new();
    };

    let mut records = Vec::new();
    for raw in items {
        match parse(raw) {
            Some(record) => records.push(record),
            None => tracing::warn!("Skipping record with missing required fields"),
        }
    }
    records
}

fn parse_employer(raw: &Value) -> Option<EmployerRecord> {
    let id = raw.get("id").and_then(parse_id)?;
    let name = raw.get("name").and_then(|v| v.as_str())?.to_string();
    let url = raw
        .get("alternate_url")
        .and_then(|v| v.as_str())
        .map(String::from);
    let open_vacancies = raw
        .get("open_vacancies")
        .and_then(|v| v.as_i64())
        .unwrap_or(0) as i32;

    Some(EmployerRecord {
        id,
        name,
        url,
        open_vacancies,
    })
}

fn parse_vacancy(raw: &Value) -> Option<VacancyRecord> {
    let id = raw.get("id").and_then(parse_id)?;
    let title = raw.get("name").and_then(|v| v.as_str())?.to_string();

    // salary is a nullable object whose from/to/currency fields are each
    // nullable on their own
    let salary = raw.get("salary").filter(|v| !v.is_null());
    let salary_from = salary
        .and_then(|s| s.get("from"))
        .and_then(Value::as_f64)
        .map(|v| v as i32);
    let salary_to = salary
        .and_then(|s| s.get("to"))
        .and_then(Value::as_f64)
        .map(|v| v as i32);
    let currency = salary
        .and_then(|s| s.get("currency"))
        .and_then(|v| v.as_str())
        .map(String::from);

    let url = raw
        .get("alternate_url")
        .and_then(|v| v.as_str())
        .map(String::from);

    Some(VacancyRecord {
        id,
        title,
        salary_from,
        salary_to,
        currency,
        url,
    })
}

/// hh.ru serializes ids as JSON strings; accept bare numbers too.
fn parse_id(v: &Value) -> Option<i64> {
    match v {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
