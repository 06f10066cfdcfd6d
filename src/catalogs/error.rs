//! Typed catalog errors mapped to HTTP statuses.

use thiserror::Error;

use crate::dates::DateParseError;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Upstream catalog did not respond within the configured deadline.
    #[error("Requested resource timed out.")]
    RequestTimedOut,

    /// Upstream request failed outright
    #[error("catalog request failed: {0}")]
    Http(reqwest::Error),

    /// Upstream responded with something we cannot interpret
    #[error("unexpected catalog payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Date(#[from] DateParseError),
}

impl CatalogError {
    /// Classify a transport error, promoting timeouts to their own variant.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::RequestTimedOut
        } else {
            CatalogError::Http(err)
        }
    }

    /// HTTP status code for the response-serialization layer
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::RequestTimedOut => 408,
            CatalogError::Http(_) | CatalogError::Payload(_) => 502,
            CatalogError::Date(_) => 400,
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::RequestTimedOut => "request_timeout",
            CatalogError::Http(_) => "bad_gateway",
            CatalogError::Payload(_) => "bad_upstream_payload",
            CatalogError::Date(_) => "invalid_date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_408() {
        let err = CatalogError::RequestTimedOut;
        assert_eq!(err.status_code(), 408);
        assert_eq!(err.code(), "request_timeout");
        assert_eq!(err.to_string(), "Requested resource timed out.");
    }

    #[test]
    fn test_payload_is_502() {
        let err = CatalogError::Payload("missing result count".to_string());
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.code(), "bad_upstream_payload");
    }

    #[test]
    fn test_date_error_is_400() {
        let err = CatalogError::from(DateParseError {
            value: "not-a-date".to_string(),
        });
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "invalid_date");
    }
}
