//! HTTP transport seam.
//!
//! The session manager only needs `POST` with a JSON body and `GET` with
//! headers. Adapters live next to their runtime: `HttpTransport` (reqwest) for
//! native code, `FetchTransport` (gloo-net) in the browser.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Where a failed request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// The request never produced a response (network, CORS, encoding, ...)
    Client,
    /// The server answered with an unsuccessful status
    Server,
}

/// Transport failure as reported by an adapter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {message}")]
    Network { message: String },

    #[error("backend returned code {status}: {body}")]
    Backend { status: u16, body: String },
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network {
            message: message.into(),
        }
    }

    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        TransportError::Backend {
            status,
            body: body.into(),
        }
    }

    pub fn origin(&self) -> FailureOrigin {
        match self {
            TransportError::Network { .. } => FailureOrigin::Client,
            TransportError::Backend { .. } => FailureOrigin::Server,
        }
    }

    /// HTTP status for server-origin failures
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Backend { status, .. } => Some(*status),
            TransportError::Network { .. } => None,
        }
    }
}

/// Extra request options for `GET`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header named `name` (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Asynchronous JSON-over-HTTP client.
///
/// Successful responses resolve to the parsed body (`Value::Null` for an empty
/// body). Futures are not required to be `Send` so browser adapters fit.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized;

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized,
    {
        (**self).post(path, body).await
    }

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<Value, TransportError> {
        (**self).get(path, options).await
    }
}

/// Parse a successful response body, treating an empty body as `null`
pub fn parse_body(text: &str) -> Result<Value, TransportError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| TransportError::network(format!("invalid response body: {e}")))
}
