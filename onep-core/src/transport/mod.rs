//! Outbound HTTP boundary.
//!
//! Every network call made by the client goes through [`Transport::exchange`]:
//! one request in, one status + body (or one error) out. Timeouts and
//! connection handling belong to the implementation, not to its callers.

mod mock;
mod reqwest_transport;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use thiserror::Error;

pub use mock::MockTransport;
pub use reqwest_transport::ReqwestTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// A single outbound HTTP request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a header. Names are case-insensitive; values must be visible ASCII.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, TransportError> {
        let name = HeaderName::try_from(name)
            .map_err(|e| TransportError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::InvalidRequest(format!("header '{}': {}", name, e)))?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Raw status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_are_case_insensitive() {
        let request = TransportRequest::new(Method::GET, "https://example.test/")
            .header("X-Exosite-Token", "abc")
            .unwrap();

        assert_eq!(request.header_str("x-exosite-token"), Some("abc"));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let err = TransportRequest::new(Method::GET, "https://example.test/")
            .header("X-Exosite-Token", "bad\nvalue")
            .unwrap_err();

        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }
}
