//! Canonical signing engine for OSS signature version 1.
//!
//! Everything in this module is pure: no clock, no I/O. The caller decides
//! the date or expiry and passes it in through [`SigningMode`].

use std::fmt::Write;

use http::{HeaderMap, Method};
use indexmap::IndexMap;
use log::debug;
use tinyoss_core::hash::base64_hmac_sha1;
use tinyoss_core::{Error, Result};

use super::constants::X_OSS_PREFIX;

/// How the signature is going to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningMode {
    /// Signature sent in the `Authorization` header, signed with an HTTP date.
    Header(String),
    /// Signature embedded in a url, signed with the unix expiry in seconds.
    Url(i64),
}

impl SigningMode {
    fn date_or_expires(&self) -> String {
        match self {
            SigningMode::Header(date) => date.clone(),
            SigningMode::Url(expires) => expires.to_string(),
        }
    }
}

/// All the inputs of a single signature.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP verb of the request.
    pub method: Method,
    /// Base64 encoded MD5 of the body.
    pub content_md5: Option<String>,
    /// MIME type of the body.
    pub content_type: Option<String>,
    /// Signing mode with its date or expiry.
    pub mode: SigningMode,
    /// Headers of the request, only `x-oss-*` ones are signed.
    pub headers: HeaderMap,
    /// Bucket the resource lives in.
    pub bucket: Option<String>,
    /// Object name, with or without a leading `/`.
    pub object_name: Option<String>,
    /// Sub-resources that take part in signing.
    pub sub_resources: IndexMap<String, String>,
}

impl SigningRequest {
    /// Create a signing request with empty content fields.
    pub fn new(method: Method, mode: SigningMode) -> Self {
        Self {
            method,
            content_md5: None,
            content_type: None,
            mode,
            headers: HeaderMap::new(),
            bucket: None,
            object_name: None,
            sub_resources: IndexMap::new(),
        }
    }

    /// Build the string to sign.
    ///
    /// ```text
    /// VERB\n
    /// Content-MD5\n
    /// Content-Type\n
    /// Date or Expires\n
    /// CanonicalizedOSSHeaders + CanonicalizedResource
    /// ```
    pub fn string_to_sign(&self) -> Result<String> {
        let mut s = String::new();
        writeln!(&mut s, "{}", self.method.as_str())?;
        writeln!(&mut s, "{}", self.content_md5.as_deref().unwrap_or_default())?;
        writeln!(&mut s, "{}", self.content_type.as_deref().unwrap_or_default())?;
        writeln!(&mut s, "{}", self.mode.date_or_expires())?;
        s.write_str(&canonicalize_headers(&self.headers)?)?;
        s.write_str(&canonicalize_resource(
            self.bucket.as_deref(),
            self.object_name.as_deref(),
            &self.sub_resources,
        ))?;

        debug!("calculated string to sign: {s:?}");
        Ok(s)
    }

    /// Calculate the signature with given secret.
    pub fn sign(&self, access_key_secret: &str) -> Result<String> {
        let string_to_sign = self.string_to_sign()?;
        Ok(base64_hmac_sha1(
            access_key_secret.as_bytes(),
            string_to_sign.as_bytes(),
        ))
    }
}

/// Render the `x-oss-*` headers as `name:value\n` lines sorted by name.
///
/// Values are signed as UTF-8 text, so non-ASCII metadata like `x-oss-meta-name: 文件`
/// is kept as is. Only values that are not valid UTF-8 are rejected.
pub fn canonicalize_headers(headers: &HeaderMap) -> Result<String> {
    let mut oss_headers = Vec::new();
    for (name, value) in headers {
        let name = name.as_str().to_lowercase();
        if !name.starts_with(X_OSS_PREFIX) {
            continue;
        }
        let value = std::str::from_utf8(value.as_bytes()).map_err(|e| {
            Error::request_invalid(format!("header {name} is not valid utf-8")).with_source(e)
        })?;
        oss_headers.push((name, value));
    }

    // Stable sort keeps repeated headers in insertion order.
    oss_headers.sort_by(|a, b| a.0.cmp(&b.0));

    let mut s = String::new();
    for (name, value) in oss_headers {
        writeln!(&mut s, "{name}:{value}")?;
    }
    Ok(s)
}

/// Render the canonical resource `/<bucket>/<object>?<sub-resources>`.
pub fn canonicalize_resource(
    bucket: Option<&str>,
    object_name: Option<&str>,
    sub_resources: &IndexMap<String, String>,
) -> String {
    let mut s = String::new();
    if let Some(bucket) = bucket.filter(|v| !v.is_empty()) {
        s.push('/');
        s.push_str(bucket);
    }
    if let Some(object_name) = object_name.filter(|v| !v.is_empty()) {
        if !object_name.starts_with('/') {
            s.push('/');
        }
        s.push_str(object_name);
    }

    let mut keys: Vec<&String> = sub_resources.keys().collect();
    keys.sort();
    for (idx, key) in keys.into_iter().enumerate() {
        s.push(if idx == 0 { '?' } else { '&' });
        s.push_str(key);
        let value = &sub_resources[key];
        if !value.is_empty() {
            s.push('=');
            s.push_str(value);
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use tinyoss_core::ErrorKind;

    const DATE: &str = "Wed, 01 Jan 2020 00:00:00 GMT";

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.append(
                http::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        headers
    }

    fn sub_resources(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonicalize_headers_sorted_and_filtered() {
        let headers = header_map(&[
            ("X-OSS-Meta-B", "2"),
            ("content-type", "text/plain"),
            ("x-oss-date", DATE),
            ("x-oss-meta-a", "1"),
            ("authorization", "OSS id:sig"),
        ]);

        assert_eq!(
            canonicalize_headers(&headers).unwrap(),
            format!("x-oss-date:{DATE}\nx-oss-meta-a:1\nx-oss-meta-b:2\n")
        );
    }

    #[test]
    fn test_canonicalize_headers_ignores_input_order() {
        let forward = header_map(&[("x-oss-a", "1"), ("x-oss-b", "2"), ("x-oss-c", "3")]);
        let backward = header_map(&[("x-oss-c", "3"), ("x-oss-b", "2"), ("x-oss-a", "1")]);

        assert_eq!(
            canonicalize_headers(&forward).unwrap(),
            canonicalize_headers(&backward).unwrap()
        );
    }

    #[test]
    fn test_canonicalize_headers_keeps_empty_value() {
        let headers = header_map(&[("x-oss-empty", "")]);
        assert_eq!(canonicalize_headers(&headers).unwrap(), "x-oss-empty:\n");
        assert_eq!(canonicalize_headers(&HeaderMap::new()).unwrap(), "");
    }

    #[test]
    fn test_canonicalize_headers_keeps_utf8_value() {
        let headers = header_map(&[("x-oss-meta-name", "文件")]);
        assert_eq!(
            canonicalize_headers(&headers).unwrap(),
            "x-oss-meta-name:文件\n"
        );

        let mut req = SigningRequest::new(Method::PUT, SigningMode::Header(DATE.to_string()));
        req.headers = headers;
        req.bucket = Some("mybucket".to_string());
        req.object_name = Some("a.txt".to_string());
        assert_eq!(
            req.string_to_sign().unwrap(),
            format!("PUT\n\n\n{DATE}\nx-oss-meta-name:文件\n/mybucket/a.txt")
        );
        assert_eq!(req.sign("secret").unwrap(), "U9jrIJ5MVTxmhrpV4jS1IKwsABM=");
    }

    #[test]
    fn test_canonicalize_headers_rejects_invalid_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-oss-meta-name",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );

        let err = canonicalize_headers(&headers).expect_err("must be rejected");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test_case(Some("mybucket"), Some("a.txt"), &[], "/mybucket/a.txt"; "bucket and object")]
    #[test_case(Some("mybucket"), Some("/a.txt"), &[], "/mybucket/a.txt"; "object with leading slash")]
    #[test_case(Some("mybucket"), None, &[("acl", "")], "/mybucket?acl"; "bucket only")]
    #[test_case(Some(""), Some("a.txt"), &[], "/a.txt"; "empty bucket")]
    #[test_case(None, None, &[], ""; "nothing")]
    #[test_case(Some("b"), Some("o"), &[("symlink", "")], "/b/o?symlink"; "bare key")]
    #[test_case(Some("b"), Some("o"), &[("versionId", "v1")], "/b/o?versionId=v1"; "key with value")]
    #[test_case(
        Some("b"),
        Some("o"),
        &[("x-oss-process", "p"), ("response-content-type", "t"), ("acl", "")],
        "/b/o?acl&response-content-type=t&x-oss-process=p";
        "sorted sub resources"
    )]
    #[test_case(
        Some("b"),
        Some("o"),
        &[("security-token", "s"), ("response-expires", "e")],
        "/b/o?response-expires=e&security-token=s";
        "shared first char sorted by full key"
    )]
    fn test_canonicalize_resource(
        bucket: Option<&str>,
        object_name: Option<&str>,
        subs: &[(&str, &str)],
        expected: &str,
    ) {
        assert_eq!(
            canonicalize_resource(bucket, object_name, &sub_resources(subs)),
            expected
        );
    }

    #[test]
    fn test_string_to_sign_with_empty_fields() {
        let req = SigningRequest::new(Method::GET, SigningMode::Url(0));
        assert_eq!(req.string_to_sign().unwrap(), "GET\n\n\n0\n");
    }

    #[test]
    fn test_sign_round_trip() {
        let mut req = SigningRequest::new(Method::PUT, SigningMode::Header(DATE.to_string()));
        req.bucket = Some("mybucket".to_string());
        req.object_name = Some("a.txt".to_string());

        assert_eq!(
            req.string_to_sign().unwrap(),
            "PUT\n\n\nWed, 01 Jan 2020 00:00:00 GMT\n/mybucket/a.txt"
        );
        assert_eq!(req.sign("secret").unwrap(), "NF6dBJUb2QHdtwm6lIWVUa91qlw=");
    }

    #[test]
    fn test_string_to_sign_full() {
        let mut req = SigningRequest::new(Method::PUT, SigningMode::Header(DATE.to_string()));
        req.content_md5 = Some("s1OmrHpu6JI29tVvgWlLuw==".to_string());
        req.content_type = Some("text/plain".to_string());
        req.headers = header_map(&[
            ("content-type", "text/plain"),
            ("x-oss-date", DATE),
            ("x-oss-security-token", "sts-token"),
        ]);
        req.bucket = Some("mybucket".to_string());
        req.object_name = Some("a.txt".to_string());

        assert_eq!(
            req.string_to_sign().unwrap(),
            format!(
                "PUT\ns1OmrHpu6JI29tVvgWlLuw==\ntext/plain\n{DATE}\nx-oss-date:{DATE}\nx-oss-security-token:sts-token\n/mybucket/a.txt"
            )
        );
        assert_eq!(req.sign("secret").unwrap(), "hGNY6jz3jjT4lKxOpnP+WNdjkso=");
    }

    #[test]
    fn test_url_mode_uses_expiry() {
        let mut req = SigningRequest::new(Method::GET, SigningMode::Url(1577838600));
        req.bucket = Some("mybucket".to_string());
        req.object_name = Some("x".to_string());
        req.sub_resources = sub_resources(&[("x-oss-process", "image/resize,w_100")]);

        assert_eq!(
            req.string_to_sign().unwrap(),
            "GET\n\n\n1577838600\n/mybucket/x?x-oss-process=image/resize,w_100"
        );
        assert_eq!(req.sign("secret").unwrap(), "c6a53OujuvwJhMyqGMPvF1lIino=");
    }
}
