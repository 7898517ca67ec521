//! Browser adapters: localStorage, `fetch` via gloo-net, and Leptos routing.

use std::rc::Rc;

use gloo_net::http::{Request, Response};
use leptos_router::NavigateOptions;
use serde::Serialize;
use serde_json::Value;

use crate::core::config::SessionConfig;
use crate::core::session::transport::parse_body;
use crate::core::session::{
    KeyValueStore, Navigator, RequestOptions, SessionManager, Transport, TransportError,
};

/// Session manager wired to the browser adapters
pub type BrowserSession = SessionManager<FetchTransport, BrowserStorage, RouterNavigator>;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn set(&self, key: &str, value: &str) {
        let Some(storage) = local_storage() else {
            tracing::warn!(key, "localStorage not available, token not persisted");
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::warn!(key, error = ?e, "failed to write localStorage");
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn remove(&self, key: &str) {
        let Some(storage) = local_storage() else {
            return;
        };
        if let Err(e) = storage.remove_item(key) {
            tracing::warn!(key, error = ?e, "failed to remove localStorage entry");
        }
    }
}

/// `fetch`-based transport
#[derive(Debug, Clone, Default)]
pub struct FetchTransport {
    config: SessionConfig,
}

impl FetchTransport {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

async fn read_response(response: Response) -> Result<Value, TransportError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::backend(status, body));
    }
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::network(e.to_string()))?;
    parse_body(&text)
}

impl Transport for FetchTransport {
    async fn post<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let response = Request::post(&self.config.url(path))
            .json(body)
            .map_err(|e| TransportError::network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        read_response(response).await
    }

    async fn get(&self, path: &str, options: &RequestOptions) -> Result<Value, TransportError> {
        let mut request = Request::get(&self.config.url(path));
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        read_response(response).await
    }
}

/// Client-side navigation through the Leptos router
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    /// Wrap the function returned by `leptos_router::hooks::use_navigate()`
    pub fn new(navigate: impl Fn(&str, NavigateOptions) + 'static) -> Self {
        Self {
            navigate: Rc::new(navigate),
        }
    }
}

impl Navigator for RouterNavigator {
    fn navigate_to(&self, path: &str) {
        (self.navigate)(path, NavigateOptions::default());
    }
}
