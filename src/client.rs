//! HTTP transport for the webhook worker.
//!
//! One POST per message, bearer auth when a token is configured, bounded
//! timeouts. No retries and no pooling beyond reqwest defaults; transport
//! failures surface to the caller unmodified.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::message::{Message, RandomBoundary};
use crate::{Error, Result};

/// Timeout for text/markdown/JSON payloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for multipart file uploads.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Webhook worker client.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    worker_url: String,
    token: Option<String>,
}

/// Response passed through to the caller: status plus JSON-or-text body.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: ResponseBody,
}

/// A response body that failed JSON parsing degrades to raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{}", value),
            ResponseBody::Text(text) => write!(f, "{}", text),
        }
    }
}

impl WebhookClient {
    /// Create a client from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::new())
    }

    /// Create a client from an explicit configuration.
    pub fn new(config: &Config) -> Result<Self> {
        if !config.has_endpoint() {
            return Err(Error::MissingEndpoint);
        }

        let http = Client::builder()
            .user_agent(concat!("qywx_client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            worker_url: config.worker_url.trim().to_string(),
            token: config.token.clone(),
        })
    }

    /// Encode and send one message; return the worker's response as-is.
    pub async fn send(&self, message: &Message) -> Result<WebhookResponse> {
        let encoded = message.encode(&RandomBoundary);
        let timeout = if message.is_upload() {
            UPLOAD_TIMEOUT
        } else {
            REQUEST_TIMEOUT
        };

        debug!(
            content_type = %encoded.content_type,
            bytes = encoded.body.len(),
            "sending message to worker"
        );

        let mut request = self
            .http
            .post(&self.worker_url)
            .timeout(timeout)
            .header(CONTENT_TYPE, encoded.content_type.as_str())
            .body(encoded.body);

        if !encoded.query.is_empty() {
            request = request.query(&encoded.query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        // Not-JSON responses degrade to raw text, never fail
        let body = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        };

        Ok(WebhookResponse { status, body })
    }

    /// Read a file fully, then upload it. The handle is closed before
    /// encoding begins.
    pub async fn upload_path(&self, path: &Path, as_image: bool) -> Result<WebhookResponse> {
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        self.send(&Message::FileUpload {
            filename,
            data,
            as_image,
        })
        .await
    }
}
