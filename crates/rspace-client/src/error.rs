// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

/// Comprehensive error type for RSpace Inventory Client operations.
///
/// Validation errors ([`InvalidIdentifier`][Error::InvalidIdentifier],
/// [`WrongRole`][Error::WrongRole], [`OutOfRange`][Error::OutOfRange],
/// [`MismatchedLengths`][Error::MismatchedLengths] and
/// [`InsufficientCapacity`][Error::InsufficientCapacity]) are raised from
/// caller-supplied data before any request is sent. The only placement error
/// that crosses the network boundary is
/// [`BulkSubmissionFailed`][Error::BulkSubmissionFailed]; per-item failures
/// inside a completed bulk operation are reported through
/// [`BulkOperationResult`][crate::BulkOperationResult] instead.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred during file operations.
    IoError(std::io::Error),
    /// Configuration parsing or loading error.
    ConfigError(config::ConfigError),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// HTTP request error from the reqwest client.
    HttpError(reqwest::Error),
    /// URL parsing error.
    UrlParseError(url::ParseError),
    /// Server returned a non-success HTTP status with its error message.
    ApiError(u16, String),
    /// The API key was rejected by the server (HTTP 401).
    Unauthorized,
    /// Server returned a payload that could not be interpreted.
    InvalidResponse(String),
    /// Invalid parameters provided to an operation.
    InvalidParameters(String),
    /// Malformed or unrecognizable item reference.
    InvalidIdentifier(String),
    /// Identifier resolves to a role incompatible with the operation.
    WrongRole(String),
    /// Row, column or dimension is zero or outside the stated grid bounds.
    OutOfRange(String),
    /// Exact placement where the item and location counts differ.
    MismatchedLengths {
        /// Number of items to place.
        items: usize,
        /// Number of target locations supplied.
        locations: usize,
    },
    /// Not enough free locations in a loaded container.
    InsufficientCapacity {
        /// Number of items to place.
        requested: usize,
        /// Number of free locations reported by the container.
        free: usize,
    },
    /// The bulk request failed as a whole (transport error or non-success
    /// HTTP status). No partial assignment should be assumed.
    BulkSubmissionFailed(Box<Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HttpError(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::UrlParseError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::HttpError(e) => write!(f, "HTTP error: {}", e),
            Error::UrlParseError(e) => write!(f, "URL parse error: {}", e),
            Error::ApiError(code, msg) => write!(f, "Error code: {}, {}", code, msg),
            Error::Unauthorized => write!(f, "Unauthorized access"),
            Error::InvalidResponse(s) => write!(f, "Invalid server response: {}", s),
            Error::InvalidParameters(s) => write!(f, "Invalid parameters: {}", s),
            Error::InvalidIdentifier(s) => write!(f, "Invalid identifier: {}", s),
            Error::WrongRole(s) => write!(f, "Wrong role: {}", s),
            Error::OutOfRange(s) => write!(f, "Out of range: {}", s),
            Error::MismatchedLengths { items, locations } => write!(
                f,
                "Mismatched lengths: {} items but {} locations",
                items, locations
            ),
            Error::InsufficientCapacity { requested, free } => write!(
                f,
                "Insufficient capacity: {} items requested but only {} free",
                requested, free
            ),
            Error::BulkSubmissionFailed(e) => write!(f, "Bulk submission failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::HttpError(e) => Some(e),
            Error::UrlParseError(e) => Some(e),
            Error::BulkSubmissionFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_bulk_submission_failed_exposes_cause() {
        let err = Error::BulkSubmissionFailed(Box::new(Error::ApiError(
            500,
            "error message: boom, errors: no error list".to_string(),
        )));
        assert_eq!(
            err.to_string(),
            "Bulk submission failed: Error code: 500, error message: boom, errors: no error list"
        );
        let source = err.source().expect("bulk failure should carry its cause");
        assert!(source.to_string().starts_with("Error code: 500"));
    }

    #[test]
    fn test_capacity_message() {
        let err = Error::InsufficientCapacity {
            requested: 5,
            free: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient capacity: 5 items requested but only 3 free"
        );
        assert!(err.source().is_none());
    }
}
