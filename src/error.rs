//! Error types for the webhook client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Webhook URL is not configured (set WORKER_URL)")]
    MissingEndpoint,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
