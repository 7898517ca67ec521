//! Session configuration.
//!
//! Defaults match the backend the session manager was written against. On the
//! native side, load overrides with `SessionConfig::from_env()`, which also
//! reads a `.env` file through dotenvy.

use serde::{Deserialize, Serialize};

/// Default localStorage key holding the raw token
pub const DEFAULT_STORAGE_KEY: &str = "usertoken";

/// Default route to navigate to after logout
pub const DEFAULT_LOGOUT_REDIRECT: &str = "/";

/// How the token is presented in the `Authorization` header of authenticated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: " <token>"` (raw token after a single space)
    Legacy,
}

impl AuthScheme {
    /// Build the header value for `token`
    pub fn header_value(self, token: &str) -> String {
        match self {
            AuthScheme::Bearer => format!("Bearer {token}"),
            AuthScheme::Legacy => format!(" {token}"),
        }
    }

    /// Parse a scheme name (`bearer` or `legacy`, case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" => Some(AuthScheme::Bearer),
            "legacy" | "raw" => Some(AuthScheme::Legacy),
            _ => None,
        }
    }
}

/// Backend paths used by the session manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub register: String,
    pub login: String,
    pub profile: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            register: "/api/login/register".to_string(),
            login: "/api/login/login".to_string(),
            profile: "/api/login/profile".to_string(),
        }
    }
}

/// Session manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Durable storage key for the token
    pub storage_key: String,
    /// Backend endpoint paths
    pub endpoints: Endpoints,
    /// Authorization header format for `profile`
    pub auth_scheme: AuthScheme,
    /// Route passed to the navigator on logout
    pub logout_redirect: String,
    /// Origin prepended to endpoint paths (e.g. `https://api.example.com`).
    /// `None` keeps paths relative to the page origin.
    pub api_base: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            endpoints: Endpoints::default(),
            auth_scheme: AuthScheme::default(),
            logout_redirect: DEFAULT_LOGOUT_REDIRECT.to_string(),
            api_base: None,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables (and `.env`, if present),
    /// falling back to defaults.
    #[cfg(feature = "ssr")]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let auth_scheme = match var("SESSION_AUTH_SCHEME") {
            Some(raw) => AuthScheme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown SESSION_AUTH_SCHEME, using default");
                defaults.auth_scheme
            }),
            None => defaults.auth_scheme,
        };

        Self {
            storage_key: var("SESSION_STORAGE_KEY").unwrap_or(defaults.storage_key),
            endpoints: Endpoints {
                register: var("SESSION_ENDPOINT_REGISTER").unwrap_or(defaults.endpoints.register),
                login: var("SESSION_ENDPOINT_LOGIN").unwrap_or(defaults.endpoints.login),
                profile: var("SESSION_ENDPOINT_PROFILE").unwrap_or(defaults.endpoints.profile),
            },
            auth_scheme,
            logout_redirect: var("SESSION_LOGOUT_REDIRECT").unwrap_or(defaults.logout_redirect),
            api_base: var("SESSION_API_BASE"),
        }
    }

    /// Set the storage key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the endpoint paths
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the authorization scheme
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Set the logout redirect route
    pub fn logout_redirect(mut self, path: impl Into<String>) -> Self {
        self.logout_redirect = path.into();
        self
    }

    /// Set the API origin
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Join `path` onto the API base, if one is configured
    pub fn url(&self, path: &str) -> String {
        match self.api_base.as_deref() {
            Some(base) => join_url(base, path),
            None => path.to_string(),
        }
    }
}

/// Join a base URL and a path with exactly one `/` between them
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
