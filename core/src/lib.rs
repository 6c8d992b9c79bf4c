//! Core components for signing and uploading to object storage.
//!
//! This crate provides the foundational types and traits for the tinyoss ecosystem.
//! Service crates such as `tinyoss-aliyun-oss` build their signing and upload logic
//! on top of the abstractions defined here.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending and environment access
//! - **Traits**: Abstract interfaces for runtime capabilities ([`FileRead`], [`HttpSend`], [`Env`])
//! - **Error**: A single [`Error`] type with an [`ErrorKind`] that every crate in the workspace returns
//!
//! ## Example
//!
//! ```
//! use tinyoss_core::{Context, StaticEnv};
//! use std::collections::HashMap;
//!
//! let ctx = Context::new().with_env(StaticEnv {
//!     envs: HashMap::from([("KEY".to_string(), "value".to_string())]),
//! });
//!
//! assert_eq!(ctx.env_var("KEY"), Some("value".to_string()));
//! ```
//!
//! ## Utilities
//!
//! The crate also provides utility modules:
//!
//! - [`hash`]: Digest, HMAC and base64 helpers
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{
    Context, Env, FileRead, HttpSend, NoopEnv, NoopFileRead, NoopHttpSend, OsEnv,
    ProgressCallback, StaticEnv,
};
