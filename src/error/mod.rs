use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing TATUM_API_KEY, set it in a .env file or environment variables")]
    MissingApiKey,
    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("could not decode provider response: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("RPC error: {0}")]
    RpcError(String),
    #[error("could not write CSV report")]
    CsvError(#[from] csv::Error),
    #[error("could not write report")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    DomainError(#[from] crate::domain::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
