use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse animelist page: {0}")]
    Parse(String),
}
