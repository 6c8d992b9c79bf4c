use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use indexmap::IndexMap;
use tinyoss_core::ProgressCallback;

use super::constants::DEFAULT_SIGNATURE_URL_EXPIRES;

/// Hook with access to the fully signed request right before it's sent.
pub type RequestHook = Arc<dyn Fn(&mut http::Request<Bytes>) + Send + Sync + 'static>;

/// Options for uploads.
#[derive(Clone, Default)]
pub struct PutOptions {
    /// MIME type of the body, sent as `Content-Type` and signed.
    pub content_type: Option<String>,
    /// Called with the upload percent while the body is being sent.
    pub progress: Option<Arc<dyn ProgressCallback>>,
    /// Called after signing and before dispatch.
    pub request_hook: Option<RequestHook>,
}

impl Debug for PutOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PutOptions")
            .field("content_type", &self.content_type)
            .field("progress", &self.progress.is_some())
            .field("request_hook", &self.request_hook.is_some())
            .finish()
    }
}

impl PutOptions {
    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the progress callback.
    pub fn with_progress(mut self, progress: impl ProgressCallback) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Set the request hook.
    pub fn with_request_hook(
        mut self,
        hook: impl Fn(&mut http::Request<Bytes>) + Send + Sync + 'static,
    ) -> Self {
        self.request_hook = Some(Arc::new(hook));
        self
    }
}

/// Options for [`Client::signature_url`](crate::Client::signature_url).
///
/// `extra` keeps insertion order: it decides the order of the query pairs
/// in the generated url.
#[derive(Debug, Clone)]
pub struct SignatureUrlOptions {
    /// How long the url stays valid, default to 1800s.
    pub expires: Duration,
    /// HTTP method the url is signed for, default to `GET`.
    pub method: Method,
    /// Image process instruction, sent as `x-oss-process`.
    pub process: Option<String>,
    /// Response header overrides like `content-disposition`, sent as `response-<field>`.
    pub response: IndexMap<String, String>,
    /// Any other option.
    ///
    /// - `x-oss-*`, `content-md5` and `content-type` are kept out of the url.
    ///   `x-oss-*` are signed as headers, and only `Content-Type` spelled
    ///   exactly is signed as the content type.
    /// - `security-token` overrides the configured STS token.
    /// - everything else becomes a lower-cased sub-resource.
    pub extra: IndexMap<String, String>,
}

impl Default for SignatureUrlOptions {
    fn default() -> Self {
        Self {
            expires: DEFAULT_SIGNATURE_URL_EXPIRES,
            method: Method::GET,
            process: None,
            response: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }
}

impl SignatureUrlOptions {
    /// Set expires.
    pub fn with_expires(mut self, expires: Duration) -> Self {
        self.expires = expires;
        self
    }

    /// Set method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set process.
    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = Some(process.into());
        self
    }

    /// Add a response header override.
    pub fn with_response(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.insert(field.into(), value.into());
        self
    }

    /// Add an extra option.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
