//! Session context for managing the browser user's session state
//!
//! This module provides a reactive context that:
//! - Owns the browser-wired session manager
//! - Mirrors the derived session status into a signal
//! - Tracks pending requests and the last error for forms

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use super::browser::{BrowserSession, BrowserStorage, FetchTransport, RouterNavigator};
use crate::core::config::SessionConfig;
use crate::core::session::{
    Credentials, RegistrationRequest, SessionError, SessionManager, SessionPayload, SessionStatus,
    TokenResponse,
};

/// Session context providing session state and actions
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// Session status derived from the stored token
    pub status: RwSignal<SessionStatus>,
    /// A register/login/profile request is in flight
    pub loading: RwSignal<bool>,
    /// Error message from the last operation
    pub error: RwSignal<Option<String>>,
    manager: StoredValue<Rc<BrowserSession>, LocalStorage>,
}

impl SessionContext {
    fn manager(&self) -> Rc<BrowserSession> {
        self.manager.with_value(Rc::clone)
    }

    /// Re-derive `status` from the stored token
    pub fn refresh(&self) {
        self.status.set(self.manager().status());
    }

    /// Check the stored token against the current time
    pub fn is_logged_in(&self) -> bool {
        self.manager().is_logged_in()
    }

    /// Claims of the current session, if any
    pub fn payload(&self) -> Option<SessionPayload> {
        self.status.with(|status| status.payload().cloned())
    }

    /// Raw bearer token for ad-hoc authenticated requests
    pub fn token(&self) -> Option<String> {
        self.manager().token()
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }

    async fn track<T>(
        &self,
        operation: impl Future<Output = Result<T, SessionError>>,
    ) -> Result<T, SessionError> {
        self.loading.set(true);
        self.error.set(None);

        let result = operation.await;

        self.loading.set(false);
        if let Err(ref e) = result {
            self.error.set(Some(e.to_string()));
        }
        self.refresh();
        result
    }

    pub async fn register(&self, request: RegistrationRequest) -> Result<Value, SessionError> {
        let manager = self.manager();
        self.track(manager.register(&request)).await
    }

    pub async fn login(&self, credentials: Credentials) -> Result<TokenResponse, SessionError> {
        let manager = self.manager();
        self.track(manager.login(&credentials)).await
    }

    pub async fn profile(&self) -> Result<Value, SessionError> {
        let manager = self.manager();
        self.track(manager.profile()).await
    }

    /// Forget the token and navigate to the logout redirect
    pub fn logout(&self) {
        self.manager().logout();
        self.error.set(None);
        self.refresh();
    }
}

/// Provide the session context to the component tree.
///
/// Must be called inside a `<Router>`, since logout navigates through it.
pub fn provide_session_context(config: SessionConfig) -> SessionContext {
    let navigator = RouterNavigator::new(use_navigate());
    let transport = FetchTransport::from_config(&config);
    let manager = SessionManager::new(config, transport, BrowserStorage, navigator);

    // Start anonymous so the first render matches the server markup
    let ctx = SessionContext {
        status: RwSignal::new(SessionStatus::Anonymous),
        loading: RwSignal::new(false),
        error: RwSignal::new(None),
        manager: StoredValue::new_local(Rc::new(manager)),
    };

    // Read the stored token once hydration is complete
    Effect::new(move |_| ctx.refresh());

    provide_context(ctx);
    ctx
}

/// Get session context from the component tree
pub fn use_session_context() -> SessionContext {
    expect_context::<SessionContext>()
}
