// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used in aliyun services.
pub const ALIBABA_CLOUD_ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
pub const ALIBABA_CLOUD_ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
pub const ALIBABA_CLOUD_SECURITY_TOKEN: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";
pub const ALIBABA_CLOUD_OSS_BUCKET: &str = "ALIBABA_CLOUD_OSS_BUCKET";
pub const ALIBABA_CLOUD_OSS_REGION: &str = "ALIBABA_CLOUD_OSS_REGION";
pub const ALIBABA_CLOUD_OSS_ENDPOINT: &str = "ALIBABA_CLOUD_OSS_ENDPOINT";

// Headers used in oss services.
pub const CONTENT_MD5: &str = "content-md5";
pub const X_OSS_PREFIX: &str = "x-oss-";
pub const X_OSS_DATE: &str = "x-oss-date";
pub const X_OSS_SECURITY_TOKEN: &str = "x-oss-security-token";
pub const X_OSS_SYMLINK_TARGET: &str = "x-oss-symlink-target";

// Sub-resources used in oss services.
pub const X_OSS_PROCESS: &str = "x-oss-process";
pub const SECURITY_TOKEN: &str = "security-token";
pub const SYMLINK: &str = "symlink";

pub const DEFAULT_REGION: &str = "oss-cn-hangzhou";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_SIGNATURE_URL_EXPIRES: Duration = Duration::from_secs(1800);

/// Signed url option whose value is signed as the content type.
///
/// Only this exact spelling is signed, other spellings are routed as headers.
pub const SIGNATURE_URL_CONTENT_TYPE: &str = "Content-Type";

/// Signed url options that are consumed by the client instead of being
/// forwarded as sub-resources.
pub const RESERVED_SIGNATURE_URL_OPTIONS: [&str; 4] = ["expires", "response", "process", "method"];

/// AsciiSet matching ECMAScript `encodeURIComponent`.
///
/// - Encode every byte except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub static URI_COMPONENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// AsciiSet matching ECMAScript `encodeURI`.
///
/// - Same as [`URI_COMPONENT_ENCODE_SET`] but also keeps `; , / ? : @ & = + $ #`.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// AsciiSet for object names placed in a request path.
///
/// - Encode every byte except `A-Z a-z 0-9 - _ . ~ /`.
pub static OBJECT_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');
