use thiserror::Error;

#[derive(Debug, Error)]
pub enum NyaaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse listing page: {0}")]
    Parse(String),
}
