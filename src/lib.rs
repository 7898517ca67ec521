//! auth-session - Browser session management
//!
//! Stores the bearer token issued by the login backend, derives session state
//! from its JWT payload, and wraps the register/login/profile calls. The core
//! is runtime-agnostic; the `hydrate` feature wires it to localStorage,
//! `fetch` and the Leptos router.

pub mod core;
#[cfg(feature = "hydrate")]
pub mod ui;

pub use crate::core::{
    AuthScheme, Credentials, RegistrationRequest, SessionConfig, SessionError, SessionManager,
    SessionPayload, SessionStatus, TokenResponse, TransportError,
};

/// Browser entry point: panic hook and console logging
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    ui::init_tracing();
}
