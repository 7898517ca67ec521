//! Browser integration for the session manager
//!
//! Adapters binding the core session logic to localStorage, `fetch` and the
//! Leptos router, plus a reactive context for components.

mod browser;
mod console;
mod context;

pub use browser::{BrowserSession, BrowserStorage, FetchTransport, RouterNavigator};
pub use console::{ConsoleMakeWriter, init_tracing};
pub use context::{SessionContext, provide_session_context, use_session_context};
