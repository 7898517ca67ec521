//! Core session logic, independent of the browser

pub mod config;
pub mod session;

pub use config::{AuthScheme, Endpoints, SessionConfig};
pub use session::*;
