// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Retry policy with URL-based classification.
//!
//! Requests are split into two scopes:
//!
//! - **Api**: REST calls under `/api/` on the configured server, covering
//!   both the inventory (`/api/inventory/v1/...`) and ELN (`/api/v1/...`)
//!   endpoints. Authentication failures are returned immediately.
//! - **FileIO**: anything else, such as attachment downloads from other
//!   hosts. Conflicts and locks are retried as well.
//!
//! | HTTP Status | Api | FileIO |
//! |-------------|-----|--------|
//! | 401, 403 | never retried | not retried |
//! | 408, 429 | retried | retried |
//! | 409, 423 | not retried | retried |
//! | 5xx | retried | retried |
//! | transport error | retried | retried |
//!
//! The retry count comes from [`ClientConfig::max_retries`][crate::ClientConfig]
//! (`RSPACE_MAX_RETRIES`, default 3) and applies to both scopes.
//!
//! # Examples
//!
//! ```rust
//! use rspace_client::{RetryScope, classify_url};
//!
//! let server = "https://rspace.example.org";
//! assert_eq!(
//!     classify_url("https://rspace.example.org/api/inventory/v1/bulk", server),
//!     RetryScope::Api
//! );
//! assert_eq!(
//!     classify_url("https://files.example.net/attachment.bin", server),
//!     RetryScope::FileIO
//! );
//! ```

use log::debug;
use url::Url;

/// Retry scope selected for a request URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryScope {
    /// REST API calls to the configured server. Fail fast on
    /// authentication errors.
    Api,

    /// Any other transfer. Retry every transient failure.
    FileIO,
}

/// Classifies `url` against the configured `server` base URL.
///
/// A URL is [`RetryScope::Api`] when it uses HTTP(S), its host and port
/// equal the server's, and its path is `/api` or starts with `/api/`. Only
/// the parsed host is compared, so `https://evil.com/rspace.example.org/api`
/// is not an API URL.
pub fn classify_url(url: &str, server: &str) -> RetryScope {
    let (Ok(parsed), Ok(server)) = (Url::parse(url), Url::parse(server)) else {
        return RetryScope::FileIO;
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return RetryScope::FileIO;
    }

    let same_host = parsed.host_str().is_some()
        && parsed.host_str() == server.host_str()
        && parsed.port_or_known_default() == server.port_or_known_default();

    // Path must be exactly "/api" or start with "/api/" (not "/apis" etc.)
    let path = parsed.path();
    let path_is_api = path == "/api" || path.starts_with("/api/");

    if same_host && path_is_api {
        RetryScope::Api
    } else {
        RetryScope::FileIO
    }
}

/// Builds the reqwest retry policy for a client talking to `server`.
pub fn create_retry_policy(server: &str, max_retries: u32) -> reqwest::retry::Builder {
    let server = server.to_owned();

    // Wildcard host scope, classification happens per request.
    reqwest::retry::for_host("*")
        .max_retries_per_request(max_retries)
        .classify_fn(move |req_rep| {
            let url = req_rep.uri().to_string();

            match classify_url(&url, &server) {
                RetryScope::Api => match req_rep.status() {
                    Some(status) => match status.as_u16() {
                        401 | 403 => req_rep.success(),
                        429 | 408 | 500..=599 => req_rep.retryable(),
                        _ => req_rep.success(),
                    },
                    // No status: connection error, timeout or other transport failure.
                    None if req_rep.error().is_some() => req_rep.retryable(),
                    None => req_rep.success(),
                },
                RetryScope::FileIO => match req_rep.status() {
                    Some(status) => match status.as_u16() {
                        429 | 408 | 500..=599 | 409 | 423 => req_rep.retryable(),
                        _ => req_rep.success(),
                    },
                    None if req_rep.error().is_some() => req_rep.retryable(),
                    None => req_rep.success(),
                },
            }
        })
}

pub fn log_retry_configuration(server: &str, max_retries: u32, timeout: u64) {
    debug!(
        "Retry configuration for {} - max_retries={}, timeout={}s",
        server, max_retries, timeout
    );
}
