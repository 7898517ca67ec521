//! Session manager: token lifecycle and session-state derivation.

use serde_json::Value;

use super::clock::{Clock, SystemClock};
use super::error::{SessionError, handle_transport_failure};
use super::models::{Credentials, RegistrationRequest, SessionPayload, TokenResponse};
use super::navigator::Navigator;
use super::store::{KeyValueStore, TokenSlot};
use super::token::decode_payload;
use super::transport::{RequestOptions, Transport};
use crate::core::config::SessionConfig;

/// Session state derived from the stored token
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionStatus {
    /// No token stored
    #[default]
    Anonymous,
    /// Token decoded and not yet expired
    Active(SessionPayload),
    /// Token decoded but past its `exp`
    Expired(SessionPayload),
    /// Token present but its payload could not be decoded
    Malformed,
}

impl SessionStatus {
    /// Whether this is an unexpired session
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Active(_))
    }

    /// Decoded payload, whether active or expired
    pub fn payload(&self) -> Option<&SessionPayload> {
        match self {
            SessionStatus::Active(payload) | SessionStatus::Expired(payload) => Some(payload),
            SessionStatus::Anonymous | SessionStatus::Malformed => None,
        }
    }
}

/// Stores the bearer token, derives session state from it, and talks to the
/// login backend through an injected transport.
pub struct SessionManager<T, S, N, C = SystemClock> {
    config: SessionConfig,
    transport: T,
    slot: TokenSlot<S>,
    navigator: N,
    clock: C,
}

impl<T, S, N> SessionManager<T, S, N, SystemClock>
where
    T: Transport,
    S: KeyValueStore,
    N: Navigator,
{
    /// Create a manager using the system clock
    pub fn new(config: SessionConfig, transport: T, store: S, navigator: N) -> Self {
        let slot = TokenSlot::new(store, config.storage_key.clone());
        Self {
            config,
            transport,
            slot,
            navigator,
            clock: SystemClock,
        }
    }
}

impl<T, S, N, C> SessionManager<T, S, N, C>
where
    T: Transport,
    S: KeyValueStore,
    N: Navigator,
    C: Clock,
{
    /// Replace the clock used for expiry checks
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SessionManager<T, S, N, C2> {
        SessionManager {
            config: self.config,
            transport: self.transport,
            slot: self.slot,
            navigator: self.navigator,
            clock,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn slot(&self) -> &TokenSlot<S> {
        &self.slot
    }

    /// Persist `token` and cache it. Any string is accepted.
    pub fn save_token(&self, token: &str) {
        self.slot.save(token);
    }

    /// The current token, if one was ever stored and not logged out.
    /// An empty stored token counts as absent.
    pub fn token(&self) -> Option<String> {
        self.slot.load()
    }

    /// Decode the payload of the stored token.
    ///
    /// Returns `Ok(None)` without a token, and `SessionError::MalformedToken`
    /// when the token cannot be decoded.
    pub fn session_payload(&self) -> Result<Option<SessionPayload>, SessionError> {
        match self.token() {
            Some(token) => Ok(Some(decode_payload(&token)?)),
            None => Ok(None),
        }
    }

    /// Classify the stored token against the current time
    pub fn status(&self) -> SessionStatus {
        match self.session_payload() {
            Ok(None) => SessionStatus::Anonymous,
            Ok(Some(payload)) if payload.is_valid_at(self.clock.now_seconds()) => {
                SessionStatus::Active(payload)
            }
            Ok(Some(payload)) => SessionStatus::Expired(payload),
            Err(err) => {
                tracing::warn!(error = %err, "treating malformed token as logged out");
                SessionStatus::Malformed
            }
        }
    }

    /// `true` iff a token is stored, decodes, and `exp` is after now
    pub fn is_logged_in(&self) -> bool {
        self.status().is_active()
    }

    /// Seconds until the current session expires, `None` when not logged in
    pub fn expires_in(&self) -> Option<i64> {
        match self.status() {
            SessionStatus::Active(payload) => {
                Some(payload.remaining_at(self.clock.now_seconds()))
            }
            _ => None,
        }
    }

    /// Create an account. The response body is returned as-is; no token is stored.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Value, SessionError> {
        self.transport
            .post(&self.config.endpoints.register, request)
            .await
            .map_err(|err| handle_transport_failure("register", err))
    }

    /// Log in and store the returned token, if the response carries a non-empty one.
    ///
    /// A logout that happens while the request is in flight wins: the token is
    /// discarded and `SessionError::LoginSuperseded` is returned.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, SessionError> {
        let epoch = self.slot.epoch();

        let body = self
            .transport
            .post(&self.config.endpoints.login, credentials)
            .await
            .map_err(|err| handle_transport_failure("login", err))?;

        let response: TokenResponse = serde_json::from_value(body).map_err(|err| {
            tracing::warn!(error = %err, "login response is not a token object");
            SessionError::InvalidResponse(err)
        })?;

        if let Some(token) = response.token() {
            if !self.slot.save_if_current(epoch, token) {
                tracing::warn!("discarding token from a login that completed after logout");
                return Err(SessionError::LoginSuperseded);
            }
        }

        Ok(response)
    }

    /// Fetch the profile of the logged-in user
    pub async fn profile(&self) -> Result<Value, SessionError> {
        let options = self.auth_options();
        self.transport
            .get(&self.config.endpoints.profile, &options)
            .await
            .map_err(|err| handle_transport_failure("profile", err))
    }

    /// Headers for authenticated requests; empty without a token
    pub fn auth_options(&self) -> RequestOptions {
        match self.token() {
            Some(token) => RequestOptions::new()
                .header("Authorization", self.config.auth_scheme.header_value(&token)),
            None => RequestOptions::new(),
        }
    }

    /// Forget the token and navigate to the logout redirect
    pub fn logout(&self) {
        self.slot.clear();
        self.navigator.navigate_to(&self.config.logout_redirect);
    }
}
