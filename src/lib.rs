//! Group-bot webhook client library
//!
//! This library provides tools to:
//! - Encode chat messages (text, markdown, link cards, images, file uploads)
//!   into the webhook worker's wire formats
//! - Send encoded messages over HTTP with optional bearer authentication
//! - Synthesize a minimal 1×1 PNG as a deterministic binary fixture

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod mime;
pub mod png;

// Re-export common types
pub use client::{ResponseBody, WebhookClient, WebhookResponse};
pub use config::Config;
pub use error::{Error, Result};
pub use message::{BoundarySource, EncodedRequest, Message, RandomBoundary};
