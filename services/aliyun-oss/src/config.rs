use std::fmt::{Debug, Formatter};
use std::time::Duration;

use super::constants::*;
use crate::Credential;
use tinyoss_core::utils::Redact;
use tinyoss_core::{Context, Error, Result};

/// Config carries all the configuration for an OSS client.
#[derive(Clone)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `access_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_ACCESS_KEY_SECRET`]
    pub access_key_secret: Option<String>,
    /// `security_token` is the STS token used by temporary authorization.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_SECURITY_TOKEN`]
    pub security_token: Option<String>,
    /// `policy` disables header signing for uploads.
    ///
    /// The service validates such uploads with the policy document instead.
    pub policy: Option<String>,
    /// `bucket` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_BUCKET`]
    pub bucket: Option<String>,
    /// `endpoint` overrides the host derived from bucket and region.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ALIBABA_CLOUD_OSS_ENDPOINT`]
    pub endpoint: Option<String>,
    /// `region` of the bucket, default to [`DEFAULT_REGION`].
    ///
    /// - env value: [`ALIBABA_CLOUD_OSS_REGION`] if this field is still the default
    pub region: String,
    /// Access OSS through the aliyun internal network.
    pub internal: bool,
    /// Use `https` instead of `http`.
    pub secure: bool,
    /// Timeout for every request sent by the client, `Duration::ZERO` disables it.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key_id: None,
            access_key_secret: None,
            security_token: None,
            policy: None,
            bucket: None,
            endpoint: None,
            region: DEFAULT_REGION.to_string(),
            internal: false,
            secure: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .field("policy", &Redact::from(&self.policy))
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("internal", &self.internal)
            .field("secure", &self.secure)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_ACCESS_KEY_SECRET) {
            self.access_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_SECURITY_TOKEN) {
            self.security_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_BUCKET) {
            self.bucket.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(ALIBABA_CLOUD_OSS_REGION) {
            if self.region == DEFAULT_REGION {
                self.region = v;
            }
        }

        self
    }

    /// Build the credential, failing if the access key pair is incomplete.
    pub fn credential(&self) -> Result<Credential> {
        let Some(access_key_id) = non_empty(&self.access_key_id) else {
            return Err(Error::config_invalid("need accessKeyId"));
        };
        let Some(access_key_secret) = non_empty(&self.access_key_secret) else {
            return Err(Error::config_invalid("need accessKeySecret"));
        };

        Ok(Credential {
            access_key_id: access_key_id.to_string(),
            access_key_secret: access_key_secret.to_string(),
            security_token: non_empty(&self.security_token).map(|v| v.to_string()),
        })
    }

    /// Resolve the host requests are sent to.
    ///
    /// - `endpoint` if it's set.
    /// - `<bucket>[-internal].<region>.aliyuncs.com` otherwise.
    pub fn host(&self) -> Result<String> {
        if let Some(endpoint) = non_empty(&self.endpoint) {
            return Ok(endpoint.to_string());
        }
        let Some(bucket) = non_empty(&self.bucket) else {
            return Err(Error::config_invalid("need bucket or endpoint"));
        };

        let mut host = bucket.to_string();
        if self.internal {
            host.push_str("-internal");
        }
        host.push('.');
        host.push_str(&self.region);
        host.push_str(".aliyuncs.com");
        Ok(host)
    }

    /// Scheme used for every url built by the client.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }
}

/// Empty strings are treated the same as unset values.
pub(crate) fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tinyoss_core::{ErrorKind, StaticEnv};

    fn full_config() -> Config {
        Config {
            access_key_id: Some("access_key_id".to_string()),
            access_key_secret: Some("access_key_secret".to_string()),
            bucket: Some("mybucket".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_host_from_bucket_and_region() {
        let cfg = full_config();
        assert_eq!(cfg.host().unwrap(), "mybucket.oss-cn-hangzhou.aliyuncs.com");

        let cfg = Config {
            region: "oss-cn-beijing".to_string(),
            internal: true,
            ..full_config()
        };
        assert_eq!(
            cfg.host().unwrap(),
            "mybucket-internal.oss-cn-beijing.aliyuncs.com"
        );
    }

    #[test]
    fn test_endpoint_takes_priority() {
        let cfg = Config {
            endpoint: Some("oss.example.com".to_string()),
            internal: true,
            ..full_config()
        };
        assert_eq!(cfg.host().unwrap(), "oss.example.com");

        let cfg = Config {
            bucket: None,
            ..cfg
        };
        assert_eq!(cfg.host().unwrap(), "oss.example.com");
    }

    #[test]
    fn test_missing_fields() {
        let cases = vec![
            (
                Config {
                    access_key_id: None,
                    ..full_config()
                },
                "need accessKeyId",
            ),
            (
                Config {
                    access_key_secret: Some(String::new()),
                    ..full_config()
                },
                "need accessKeySecret",
            ),
        ];
        for (cfg, msg) in cases {
            let err = cfg.credential().expect_err("credential must be rejected");
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
            assert!(err.to_string().contains(msg), "unexpected error: {err}");
        }

        let cfg = Config {
            bucket: None,
            ..full_config()
        };
        let err = cfg.host().expect_err("host must be rejected");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("need bucket or endpoint"));
    }

    #[test]
    fn test_scheme() {
        assert_eq!(full_config().scheme(), "http");
        let cfg = Config {
            secure: true,
            ..full_config()
        };
        assert_eq!(cfg.scheme(), "https");
    }

    #[test]
    fn test_from_env() {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from([
                (ALIBABA_CLOUD_ACCESS_KEY_ID.to_string(), "env_ak".to_string()),
                (ALIBABA_CLOUD_ACCESS_KEY_SECRET.to_string(), "env_sk".to_string()),
                (ALIBABA_CLOUD_SECURITY_TOKEN.to_string(), "env_token".to_string()),
                (ALIBABA_CLOUD_OSS_BUCKET.to_string(), "env_bucket".to_string()),
                (ALIBABA_CLOUD_OSS_REGION.to_string(), "oss-cn-shanghai".to_string()),
            ]),
        });

        let cfg = Config {
            access_key_id: Some("explicit_ak".to_string()),
            ..Default::default()
        }
        .from_env(&ctx);

        assert_eq!(cfg.access_key_id.as_deref(), Some("explicit_ak"));
        assert_eq!(cfg.access_key_secret.as_deref(), Some("env_sk"));
        assert_eq!(cfg.security_token.as_deref(), Some("env_token"));
        assert_eq!(cfg.bucket.as_deref(), Some("env_bucket"));
        assert_eq!(cfg.endpoint, None);
        assert_eq!(cfg.region, "oss-cn-shanghai");
        assert_eq!(cfg.host().unwrap(), "env_bucket.oss-cn-shanghai.aliyuncs.com");

        let cred = cfg.credential().unwrap();
        assert_eq!(cred.access_key_id, "explicit_ak");
        assert_eq!(cred.security_token.as_deref(), Some("env_token"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cfg = Config {
            access_key_secret: Some("a-very-long-secret-value".to_string()),
            ..full_config()
        };
        let output = format!("{cfg:?}");
        assert!(!output.contains("a-very-long-secret-value"));
        assert!(output.contains("a-v***lue"));
    }
}
