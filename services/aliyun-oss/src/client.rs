use std::sync::Arc;

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use log::debug;
use percent_encoding::utf8_percent_encode;
use tinyoss_core::hash::base64_md5;
use tinyoss_core::time::{add_duration, format_http_date, now, DateTime};
use tinyoss_core::{Context, Error, ProgressCallback, Result};

use super::config::non_empty;
use super::constants::*;
use crate::sign_request::{SigningMode, SigningRequest};
use crate::{Config, Credential, PutOptions, RequestHook, SignatureUrlOptions};

/// Client signs and sends requests to a single OSS bucket.
///
/// Config and credential are fixed at construction, `Client` is cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    credential: Credential,
    host: String,

    time: Option<DateTime>,
}

impl Client {
    /// Create a new client.
    ///
    /// Returns a config error if the access key pair is missing, or if
    /// neither bucket nor endpoint is set.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        let credential = config.credential()?;
        let host = config.host()?;
        debug!("oss client resolved host: {host}");

        Ok(Self {
            ctx,
            config: Arc::new(config),
            credential,
            host,
            time: None,
        })
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    /// Host that requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}://{}/{}",
            self.config.scheme(),
            self.host,
            utf8_percent_encode(object_name, &OBJECT_PATH_ENCODE_SET)
        )
    }

    fn signing_request(
        &self,
        method: Method,
        mode: SigningMode,
        object_name: &str,
    ) -> SigningRequest {
        let mut req = SigningRequest::new(method, mode);
        req.bucket = self.config.bucket.clone();
        req.object_name = Some(object_name.to_string());
        req
    }

    fn authorization(&self, signature: &str) -> Result<HeaderValue> {
        let mut value: HeaderValue =
            format!("OSS {}:{}", self.credential.access_key_id, signature).parse()?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Build a signed upload request without sending it.
    ///
    /// If `policy` is configured, the request carries no `Authorization` header.
    pub fn build_put_request(
        &self,
        object_name: &str,
        body: Bytes,
        opts: &PutOptions,
    ) -> Result<http::Request<Bytes>> {
        let date = format_http_date(self.get_time());
        let content_md5 = base64_md5(&body);
        let content_type = opts.content_type.clone().filter(|v| !v.is_empty());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_MD5, content_md5.parse()?);
        if let Some(v) = &content_type {
            headers.insert(CONTENT_TYPE, v.parse()?);
        }
        headers.insert(X_OSS_DATE, date.parse()?);
        if let Some(token) = &self.credential.security_token {
            headers.insert(X_OSS_SECURITY_TOKEN, token.parse()?);
        }

        if non_empty(&self.config.policy).is_some() {
            debug!("policy is configured, skip signing upload of {object_name}");
        } else {
            let mut signing =
                self.signing_request(Method::PUT, SigningMode::Header(date), object_name);
            signing.content_md5 = Some(content_md5);
            signing.content_type = content_type;
            signing.headers = headers.clone();

            let signature = signing.sign(&self.credential.access_key_secret)?;
            headers.insert(AUTHORIZATION, self.authorization(&signature)?);
        }

        let mut req = http::Request::builder()
            .method(Method::PUT)
            .uri(self.object_url(object_name))
            .body(body)?;
        *req.headers_mut() = headers;
        Ok(req)
    }

    /// Upload `body` as `object_name`.
    pub async fn put(
        &self,
        object_name: &str,
        body: impl Into<Bytes>,
        opts: PutOptions,
    ) -> Result<http::Response<Bytes>> {
        let req = self.build_put_request(object_name, body.into(), &opts)?;
        self.send(req, opts.progress, opts.request_hook).await
    }

    /// Upload the file at `path` as `object_name`.
    ///
    /// The file is read through the [`FileRead`](tinyoss_core::FileRead) of the context.
    pub async fn put_file(
        &self,
        object_name: &str,
        path: &str,
        opts: PutOptions,
    ) -> Result<http::Response<Bytes>> {
        let content = self.ctx.file_read(path).await?;
        self.put(object_name, content, opts).await
    }

    /// Build a signed symlink creation request without sending it.
    ///
    /// Symlink requests are always signed, `policy` doesn't apply.
    pub fn build_symlink_request(
        &self,
        name: &str,
        target_name: &str,
    ) -> Result<http::Request<Bytes>> {
        let date = format_http_date(self.get_time());

        let mut headers = HeaderMap::new();
        headers.insert(X_OSS_DATE, date.parse()?);
        headers.insert(
            X_OSS_SYMLINK_TARGET,
            utf8_percent_encode(target_name, &URI_ENCODE_SET)
                .to_string()
                .parse()?,
        );
        if let Some(token) = &self.credential.security_token {
            headers.insert(X_OSS_SECURITY_TOKEN, token.parse()?);
        }

        let mut signing = self.signing_request(Method::PUT, SigningMode::Header(date), name);
        signing.headers = headers.clone();
        signing.sub_resources.insert(SYMLINK.to_string(), String::new());

        let signature = signing.sign(&self.credential.access_key_secret)?;
        headers.insert(AUTHORIZATION, self.authorization(&signature)?);

        let mut req = http::Request::builder()
            .method(Method::PUT)
            .uri(format!("{}?{SYMLINK}", self.object_url(name)))
            .body(Bytes::new())?;
        *req.headers_mut() = headers;
        Ok(req)
    }

    /// Create symlink `name` pointing to `target_name`.
    pub async fn put_symlink(
        &self,
        name: &str,
        target_name: &str,
    ) -> Result<http::Response<Bytes>> {
        let req = self.build_symlink_request(name, target_name)?;
        self.send(req, None, None).await
    }

    /// Generate a pre-signed url for `object_name`.
    ///
    /// Query pairs follow `OSSAccessKeyId`, `Expires` and `Signature` in the
    /// order the sub-resources were collected:
    ///
    /// - `x-oss-process`
    /// - `response-*` overrides
    /// - extra options
    /// - `security-token`
    ///
    /// `object_name` is placed into the url as is, names with path-unsafe
    /// characters must be percent-encoded by the caller.
    ///
    /// The content md5 is never signed. The content type is signed only when
    /// given as the exact `Content-Type` extra option.
    pub fn signature_url(&self, object_name: &str, opts: &SignatureUrlOptions) -> Result<String> {
        let expires = add_duration(self.get_time(), opts.expires)?.timestamp();

        let mut headers = HeaderMap::new();
        let mut sub_resources = IndexMap::new();

        if let Some(process) = &opts.process {
            sub_resources.insert(X_OSS_PROCESS.to_string(), process.clone());
        }
        for (field, value) in &opts.response {
            sub_resources.insert(format!("response-{}", field.to_lowercase()), value.clone());
        }
        for (key, value) in &opts.extra {
            let key = key.to_lowercase();
            if key.starts_with(X_OSS_PREFIX)
                || key.starts_with(CONTENT_MD5)
                || key.starts_with(CONTENT_TYPE.as_str())
            {
                headers.insert(HeaderName::from_bytes(key.as_bytes())?, value.parse()?);
            } else if !RESERVED_SIGNATURE_URL_OPTIONS.contains(&key.as_str()) {
                sub_resources.insert(key, value.clone());
            }
        }

        let security_token = opts
            .extra
            .get(SECURITY_TOKEN)
            .filter(|v| !v.is_empty())
            .or(self.credential.security_token.as_ref());
        if let Some(token) = security_token {
            sub_resources.insert(SECURITY_TOKEN.to_string(), token.clone());
        }

        let mut signing =
            self.signing_request(opts.method.clone(), SigningMode::Url(expires), object_name);
        signing.content_type = opts.extra.get(SIGNATURE_URL_CONTENT_TYPE).cloned();
        signing.headers = headers;
        signing.sub_resources = sub_resources;
        let signature = signing.sign(&self.credential.access_key_secret)?;

        let mut url = format!(
            "{}://{}/{}?OSSAccessKeyId={}&Expires={}&Signature={}",
            self.config.scheme(),
            self.host,
            object_name,
            self.credential.access_key_id,
            expires,
            utf8_percent_encode(&signature, &URI_COMPONENT_ENCODE_SET),
        );
        for (key, value) in &signing.sub_resources {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&utf8_percent_encode(value, &URI_COMPONENT_ENCODE_SET).to_string());
        }
        Ok(url)
    }

    async fn send(
        &self,
        mut req: http::Request<Bytes>,
        progress: Option<Arc<dyn ProgressCallback>>,
        request_hook: Option<RequestHook>,
    ) -> Result<http::Response<Bytes>> {
        if let Some(hook) = request_hook {
            hook(&mut req);
        }
        debug!("sending oss request: {} {}", req.method(), req.uri());

        let fut = async {
            match progress {
                Some(progress) => self.ctx.http_send_with_progress(req, progress).await,
                None => self.ctx.http_send(req).await,
            }
        };

        let timeout = self.config.timeout;
        let resp = if timeout.is_zero() {
            fut.await?
        } else {
            tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| Error::timeout(timeout))??
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::unexpected_status(status, resp.body()));
        }
        Ok(resp)
    }
}
