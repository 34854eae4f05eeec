//! Webhook message dispatcher CLI
//!
//! Usage:
//!   qywx text "hello"                  - send plain text
//!   qywx text --json "hello"           - send text via the JSON channel
//!   qywx markdown "**bold**"           - send markdown-flavored text
//!   qywx link --title T --url U ...    - send a link/news card
//!   qywx image [file]                  - send an image via JSON base64
//!   qywx upload [file] [--as-image]    - upload a file via multipart
//!   qywx demo                          - walk through every message kind
//!
//! Endpoint comes from WORKER_URL (plus optional TOKEN), via .env or
//! config.yml. `image` and `upload` fall back to a built-in 1x1 PNG when
//! no file is given.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use qywx_client::{png, Message, WebhookClient, WebhookResponse};
use tracing::info;

#[derive(Parser)]
#[command(name = "qywx")]
#[command(about = "Send messages to a group-bot webhook worker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send plain text
    Text {
        /// Message body
        content: String,

        /// Send through the JSON channel instead of a raw text body
        #[arg(long)]
        json: bool,
    },

    /// Send markdown-flavored text
    Markdown {
        /// Message body (markdown)
        content: String,
    },

    /// Send a link/news card
    Link {
        /// Card title
        #[arg(short, long)]
        title: String,

        /// Card description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Target URL
        #[arg(short, long)]
        url: String,

        /// Cover picture URL
        #[arg(short, long, default_value = "")]
        pic_url: String,
    },

    /// Send an image through the JSON base64 channel
    Image {
        /// Image file; built-in 1x1 PNG when omitted
        file: Option<PathBuf>,
    },

    /// Upload a file via multipart/form-data
    Upload {
        /// File to upload; built-in 1x1 PNG when omitted
        file: Option<PathBuf>,

        /// Route the upload through the image channel
        #[arg(long)]
        as_image: bool,
    },

    /// Walk through every message kind against the configured worker
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qywx=info".parse().unwrap())
                .add_directive("qywx_client=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let client = WebhookClient::from_env()?;

    match cli.command {
        Commands::Text { content, json } => {
            let message = if json {
                Message::TextJson { content }
            } else {
                Message::Text { content }
            };
            show("text", client.send(&message).await?);
        }

        Commands::Markdown { content } => {
            show(
                "markdown",
                client.send(&Message::Markdown { content }).await?,
            );
        }

        Commands::Link {
            title,
            description,
            url,
            pic_url,
        } => {
            let message = Message::Link {
                title,
                description,
                url,
                pic_url,
            };
            show("link", client.send(&message).await?);
        }

        Commands::Image { file } => {
            let data = match file {
                Some(path) => tokio::fs::read(&path).await?,
                None => {
                    info!("no file given, using built-in sample PNG");
                    png::sample_png()
                }
            };
            show("image", client.send(&Message::ImageBase64 { data }).await?);
        }

        Commands::Upload { file, as_image } => {
            let response = match file {
                Some(path) => client.upload_path(&path, as_image).await?,
                None => {
                    info!("no file given, uploading built-in sample PNG");
                    client
                        .send(&Message::FileUpload {
                            filename: "sample.png".to_string(),
                            data: png::sample_png(),
                            as_image,
                        })
                        .await?
                }
            };
            show("upload", response);
        }

        Commands::Demo => {
            let sample = png::sample_png();

            show(
                "text",
                client
                    .send(&Message::Text {
                        content: "Hello from qywx".to_string(),
                    })
                    .await?,
            );
            show(
                "markdown",
                client
                    .send(&Message::Markdown {
                        content: "**Markdown** test\n> type=markdown".to_string(),
                    })
                    .await?,
            );
            show(
                "text (JSON channel)",
                client
                    .send(&Message::TextJson {
                        content: "JSON format test".to_string(),
                    })
                    .await?,
            );
            show(
                "link",
                client
                    .send(&Message::Link {
                        title: "Product update".to_string(),
                        description: "Link card demo".to_string(),
                        url: "https://example.com/changelog".to_string(),
                        pic_url: "https://example.com/cover.png".to_string(),
                    })
                    .await?,
            );
            show(
                "image (JSON base64)",
                client
                    .send(&Message::ImageBase64 {
                        data: sample.clone(),
                    })
                    .await?,
            );
            show(
                "multipart upload (file)",
                client
                    .send(&Message::FileUpload {
                        filename: "sample.png".to_string(),
                        data: sample.clone(),
                        as_image: false,
                    })
                    .await?,
            );
            show(
                "multipart upload (type=image)",
                client
                    .send(&Message::FileUpload {
                        filename: "sample.png".to_string(),
                        data: sample,
                        as_image: true,
                    })
                    .await?,
            );
        }
    }

    Ok(())
}

fn show(label: &str, response: WebhookResponse) {
    println!("== {} ==", label);
    println!("{} {}", response.status, response.body);
    if !response.is_success() {
        std::process::exit(1);
    }
}
