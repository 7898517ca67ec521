//! Browser session handling
//!
//! This module provides the token lifecycle for the frontend:
//! - Persisting the bearer token in durable storage behind an in-memory cache
//! - Decoding the JWT payload segment into session claims
//! - Deriving login state from the `exp` claim
//! - Register/login/profile calls through an injected transport
//! - Logout with navigation back to the application root

pub mod clock;
pub mod error;
#[cfg(feature = "ssr")]
pub mod file_store;
#[cfg(feature = "ssr")]
pub mod http;
pub mod manager;
pub mod models;
pub mod navigator;
pub mod store;
pub mod token;
pub mod transport;


pub use clock::{Clock, SystemClock};
pub use error::{SessionError, handle_transport_failure};
#[cfg(feature = "ssr")]
pub use file_store::FileStore;
#[cfg(feature = "ssr")]
pub use http::{HttpTransport, HttpTransportError};
pub use manager::{SessionManager, SessionStatus};
pub use models::{Credentials, RegistrationRequest, SessionPayload, TokenResponse};
pub use navigator::{Navigator, NoopNavigator};
pub use store::{KeyValueStore, MemoryStore, SlotState, TokenSlot};
pub use token::{TokenError, decode_claims, decode_payload};
pub use transport::{FailureOrigin, RequestOptions, Transport, TransportError};
