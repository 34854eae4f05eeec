//! Message encoding: logical message intents → wire payloads.
//!
//! Supported intents mirror the worker's accepted inputs:
//! - plain text / markdown (raw body, `type=markdown` query flag)
//! - text through the JSON channel (`{"type":"text",...}`)
//! - link/news card (JSON)
//! - image as base64 (JSON; the worker computes checksums itself)
//! - file upload (multipart/form-data, optionally routed as image)
//!
//! Encoding is a pure function of the message and the injected boundary
//! source; it never performs IO and cannot fail for well-formed values.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

/// Fixed marker prefixing every generated multipart boundary.
pub const BOUNDARY_PREFIX: &str = "----qywx";

/// Substituted when an upload has an empty filename.
pub const DEFAULT_FILENAME: &str = "file.bin";

/// A logical message to relay into the group chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Plain text body.
    Text { content: String },
    /// Same body as text, flagged as markdown via query parameter.
    Markdown { content: String },
    /// Text delivered through the JSON channel instead of a raw body.
    TextJson { content: String },
    /// Link/news card.
    Link {
        title: String,
        description: String,
        url: String,
        pic_url: String,
    },
    /// Image bytes, delivered base64-encoded inside a JSON payload.
    ImageBase64 { data: Vec<u8> },
    /// Raw file upload. `as_image` routes it through the image channel.
    FileUpload {
        filename: String,
        data: Vec<u8>,
        as_image: bool,
    },
}

/// One encoded POST request: body, content type and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    pub body: Vec<u8>,
    pub content_type: String,
    pub query: Vec<(String, String)>,
}

/// Source of multipart boundary tokens, injectable for tests.
pub trait BoundarySource {
    /// Produce a fresh boundary token. Must not be reused across requests.
    fn boundary(&self) -> String;
}

/// Production boundary source: `----qywx` + 32 random alphanumeric chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl BoundarySource for RandomBoundary {
    fn boundary(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        format!("{}{}", BOUNDARY_PREFIX, token)
    }
}

#[derive(Debug, Serialize)]
struct TextPayload<'a> {
    r#type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct LinkPayload<'a> {
    r#type: &'static str,
    title: &'a str,
    description: &'a str,
    url: &'a str,
    picurl: &'a str,
}

#[derive(Debug, Serialize)]
struct ImagePayload {
    r#type: &'static str,
    base64: String,
}

impl Message {
    /// Encode into a wire request using the given boundary source.
    pub fn encode(&self, boundaries: &dyn BoundarySource) -> EncodedRequest {
        match self {
            Message::Text { content } => EncodedRequest {
                body: content.as_bytes().to_vec(),
                content_type: "text/plain".to_string(),
                query: Vec::new(),
            },
            Message::Markdown { content } => EncodedRequest {
                body: content.as_bytes().to_vec(),
                content_type: "text/plain".to_string(),
                query: vec![("type".to_string(), "markdown".to_string())],
            },
            Message::TextJson { content } => {
                let payload = TextPayload {
                    r#type: "text",
                    content,
                };
                EncodedRequest {
                    body: serde_json::to_vec(&payload)
                        .expect("serializing plain strings cannot fail"),
                    content_type: "application/json".to_string(),
                    query: Vec::new(),
                }
            }
            Message::Link {
                title,
                description,
                url,
                pic_url,
            } => {
                let payload = LinkPayload {
                    r#type: "link",
                    title,
                    description,
                    url,
                    picurl: pic_url,
                };
                EncodedRequest {
                    body: serde_json::to_vec(&payload)
                        .expect("serializing plain strings cannot fail"),
                    content_type: "application/json".to_string(),
                    query: Vec::new(),
                }
            }
            Message::ImageBase64 { data } => {
                let payload = ImagePayload {
                    r#type: "image",
                    base64: BASE64.encode(data),
                };
                EncodedRequest {
                    body: serde_json::to_vec(&payload)
                        .expect("serializing plain strings cannot fail"),
                    content_type: "application/json".to_string(),
                    query: Vec::new(),
                }
            }
            Message::FileUpload {
                filename,
                data,
                as_image,
            } => {
                let boundary = boundaries.boundary();
                let body = build_multipart(&boundary, filename, data, *as_image);
                EncodedRequest {
                    body,
                    content_type: format!("multipart/form-data; boundary={}", boundary),
                    query: Vec::new(),
                }
            }
        }
    }

    /// Encode with the production boundary source.
    pub fn encode_default(&self) -> EncodedRequest {
        self.encode(&RandomBoundary)
    }

    /// True for kinds carried as multipart uploads (longer transport timeout).
    pub fn is_upload(&self) -> bool {
        matches!(self, Message::FileUpload { .. })
    }
}

/// Build the multipart body by hand. Part order is part of the wire
/// contract: the `file` part first, then the optional `type` field, then
/// the closing delimiter.
fn build_multipart(boundary: &str, filename: &str, data: &[u8], as_image: bool) -> Vec<u8> {
    let filename = if filename.is_empty() {
        DEFAULT_FILENAME
    } else {
        filename
    };
    let content_type = crate::mime::guess_type(filename);

    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if as_image {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"type\"\r\n\r\nimage\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
