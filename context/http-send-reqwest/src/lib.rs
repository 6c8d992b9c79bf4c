//! Reqwest-based HTTP transport for tinyoss.
//!
//! `ReqwestHttpSend` implements `HttpSend` from `tinyoss_core`. Plain sends
//! hand the body to reqwest as-is; sends with progress stream the body in
//! fixed-size chunks and report how much of it has been handed to the
//! connection.
//!
//! ```no_run
//! use std::time::Duration;
//! use tinyoss_core::Context;
//! use tinyoss_http_send_reqwest::ReqwestHttpSend;
//!
//! let client = reqwest::Client::builder()
//!     .pool_max_idle_per_host(10)
//!     .build()
//!     .unwrap();
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use http::header::CONTENT_LENGTH;
use http_body_util::BodyExt;
use reqwest::{Client, Request};
use tinyoss_core::{Error, ErrorKind, HttpSend, ProgressCallback, Result};

/// Size of the body chunks emitted while reporting progress.
const PROGRESS_CHUNK_SIZE: usize = 64 * 1024;

/// HttpSend implementation backed by a [`reqwest::Client`].
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, req: Request) -> Result<http::Response<Bytes>> {
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::new(ErrorKind::Timeout, "request timed out in transport").with_source(e)
                } else {
                    Error::unexpected("failed to execute request").with_source(e)
                }
            })?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        self.execute(req).await
    }

    async fn http_send_with_progress(
        &self,
        req: http::Request<Bytes>,
        progress: Arc<dyn ProgressCallback>,
    ) -> Result<http::Response<Bytes>> {
        let (mut parts, body) = req.into_parts();
        let empty = body.is_empty();

        // A streamed body has no known size, keep the request out of chunked encoding.
        if !parts.headers.contains_key(CONTENT_LENGTH) {
            parts.headers.insert(CONTENT_LENGTH, body.len().into());
        }

        let body = reqwest::Body::wrap_stream(progress_stream(body, progress.clone()));
        let req = Request::try_from(http::Request::from_parts(parts, body))
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;

        let resp = self.execute(req).await?;
        if empty {
            progress.on_progress(100.0);
        }
        Ok(resp)
    }
}

/// Split `body` into chunks, reporting progress as each chunk is polled.
fn progress_stream(
    body: Bytes,
    progress: Arc<dyn ProgressCallback>,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    let total = body.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(PROGRESS_CHUNK_SIZE)
        .map(|start| body.slice(start..total.min(start + PROGRESS_CHUNK_SIZE)))
        .collect();

    let mut sent = 0;
    futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len();
        progress.on_progress(percent(sent, total));
        Ok(chunk)
    }))
}

/// Percentage rounded to two decimals.
fn percent(sent: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (sent as f64 / total as f64 * 10000.0).round() / 100.0
}
