//! reqwest-backed transport for native clients and server-side rendering.

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::transport::{RequestOptions, Transport, TransportError, parse_body};
use crate::core::config::{SessionConfig, join_url};

/// Errors building an `HttpTransport`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpTransportError {
    /// Native requests need an absolute URL; set `SESSION_API_BASE`
    #[error("no API base configured; native requests need an absolute URL")]
    MissingApiBase,
}

/// JSON transport over reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport resolving paths against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a transport from the configured API base, which must be set
    pub fn from_config(config: &SessionConfig) -> Result<Self, HttpTransportError> {
        match config.api_base.as_deref() {
            Some(base) => Ok(Self::new(base)),
            None => Err(HttpTransportError::MissingApiBase),
        }
    }

    /// Use a preconfigured client (timeouts, proxies, TLS)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

async fn read_response(response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::backend(status.as_u16(), body));
    }
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::network(e.to_string()))?;
    parse_body(&text)
}

impl Transport for HttpTransport {
    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        read_response(response).await
    }

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<Value, TransportError> {
        let mut request = self.client.get(self.url(path));
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use serde_json::json;

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/api/login/login",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({ "token": "h.p.s", "echo": body }))
                }),
            )
            .route(
                "/api/login/register",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/api/login/profile",
                get(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "authorization": auth }))
                }),
            )
            .route("/empty", get(|| async { StatusCode::NO_CONTENT }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_from_config_requires_api_base() {
        let err = HttpTransport::from_config(&SessionConfig::default()).unwrap_err();
        assert_eq!(err, HttpTransportError::MissingApiBase);

        let transport =
            HttpTransport::from_config(&SessionConfig::default().api_base("http://localhost:8080/"))
                .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080/");
        assert_eq!(
            transport.url("/api/login/login"),
            "http://localhost:8080/api/login/login"
        );
    }

    #[tokio::test]
    async fn test_post_returns_json_body() {
        let transport = HttpTransport::new(spawn_backend().await);

        let body = transport
            .post("/api/login/login", &json!({ "email": "a@b.com" }))
            .await
            .unwrap();

        assert_eq!(body["token"], "h.p.s");
        assert_eq!(body["echo"]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_server_error_is_backend_failure() {
        let transport = HttpTransport::new(spawn_backend().await);

        let err = transport
            .post("/api/login/register", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::backend(500, "boom"));
    }

    #[tokio::test]
    async fn test_get_sends_headers() {
        let transport = HttpTransport::new(spawn_backend().await);
        let options = RequestOptions::new().header("Authorization", "Bearer h.p.s");

        let body = transport.get("/api/login/profile", &options).await.unwrap();

        assert_eq!(body["authorization"], "Bearer h.p.s");
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let transport = HttpTransport::new(spawn_backend().await);

        let body = transport.get("/empty", &RequestOptions::new()).await.unwrap();

        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = HttpTransport::new(format!("http://{addr}"));

        let err = transport
            .get("/api/login/profile", &RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Network { .. }));
    }
}
