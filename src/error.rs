#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-success, non-404 response. Distinct from a not-found miss so
    /// callers can log it as a fetch failure instead of silently treating
    /// the employer as absent.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },
}
