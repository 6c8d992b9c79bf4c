//! Aliyun OSS request signing and upload.
//!
//! This crate signs requests with OSS signature version 1 and sends them
//! through the capabilities configured in a [`tinyoss_core::Context`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use tinyoss_aliyun_oss::{Client, Config, PutOptions, SignatureUrlOptions};
//! use tinyoss_core::{Context, OsEnv, Result};
//! use tinyoss_file_read_tokio::TokioFileRead;
//! use tinyoss_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config {
//!         bucket: Some("my-bucket".to_string()),
//!         secure: true,
//!         ..Default::default()
//!     }
//!     .from_env(&ctx);
//!
//!     let client = Client::new(ctx, config)?;
//!
//!     // Upload an object.
//!     client
//!         .put(
//!             "hello.txt",
//!             "Hello, OSS!",
//!             PutOptions::default().with_content_type("text/plain"),
//!         )
//!         .await?;
//!
//!     // Point a symlink at it.
//!     client.put_symlink("latest.txt", "hello.txt").await?;
//!
//!     // Share it for 30 minutes.
//!     let url = client.signature_url("hello.txt", &SignatureUrlOptions::default())?;
//!     println!("{url}");
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! [`Config::from_env`] fills unset fields from:
//!
//! ```bash
//! export ALIBABA_CLOUD_ACCESS_KEY_ID=your-access-key-id
//! export ALIBABA_CLOUD_ACCESS_KEY_SECRET=your-access-key-secret
//! export ALIBABA_CLOUD_SECURITY_TOKEN=your-sts-token  # Optional, for STS
//! export ALIBABA_CLOUD_OSS_BUCKET=your-bucket
//! export ALIBABA_CLOUD_OSS_REGION=oss-cn-beijing     # Optional
//! export ALIBABA_CLOUD_OSS_ENDPOINT=oss.example.com  # Optional
//! ```
//!
//! ## Signing without sending
//!
//! [`Client::build_put_request`] and [`Client::build_symlink_request`] return
//! the signed `http::Request` so it can be sent by any transport. The
//! [`sign_request`] module exposes the canonicalization itself.

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod sign_request;
pub use sign_request::{SigningMode, SigningRequest};

mod options;
pub use options::{PutOptions, RequestHook, SignatureUrlOptions};

mod client;
pub use client::Client;
