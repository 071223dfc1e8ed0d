use std::fmt;
use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::credentials::{Credentials, RegistrationRequest};
use super::store::{SessionStore, StoreError};
use crate::api::client::parse_base_url;
use crate::api::transport::{HttpRequest, RequestBody, Transport};
use crate::api::ApiError;

/// Store key holding the bearer token
pub const TOKEN_KEY: &str = "vault_token";

/// Store key holding the display username
pub const USERNAME_KEY: &str = "vault_username";

/// Authenticated identity returned by `/login`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Owner of the persisted session.
///
/// The only reader and writer of the token/username entries in its store.
/// A session becomes present only through `set_auth` and absent only
/// through `logout`; `login` returns a session without committing it.
pub struct SessionManager {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            base_url: base.as_str().trim_end_matches('/').to_string(),
            transport,
            store,
        })
    }

    fn json_post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(HttpRequest {
            method: Method::POST,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body: RequestBody::json(body)?,
        })
    }

    /// Authenticate against `/login`. The result is not persisted.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self.json_post("/login", credentials)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(status = response.status.as_u16(), "Login rejected");
            return Err(ApiError::InvalidCredentials);
        }

        let session: Session = response.json()?;
        info!(username = %session.username, "Login succeeded");
        Ok(session)
    }

    /// Create an account. Duplicate usernames and validation failures are
    /// indistinguishable to the client.
    pub async fn register(&self, registration: &RegistrationRequest) -> Result<(), ApiError> {
        let request = self.json_post("/register", registration)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            warn!(status = response.status.as_u16(), "Registration rejected");
            return Err(ApiError::RegistrationFailed);
        }

        info!(username = %registration.username, "Account registered");
        Ok(())
    }

    /// Persist the session so it survives restarts
    pub fn set_auth(&self, session: &Session) -> Result<(), StoreError> {
        self.store.set_many(&[
            (TOKEN_KEY, session.token.as_str()),
            (USERNAME_KEY, session.username.as_str()),
        ])?;
        debug!(username = %session.username, "Session stored");
        Ok(())
    }

    /// Clear the persisted session. Safe to call when logged out.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove_many(&[TOKEN_KEY, USERNAME_KEY])?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some_and(|t| !t.is_empty())
    }

    pub fn get_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn get_username(&self) -> Option<String> {
        self.store.get(USERNAME_KEY)
    }

    /// `Authorization: Bearer <token>` when a token is stored, otherwise empty
    pub fn get_auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Some(token) = self.get_token().filter(|t| !t.is_empty()) else {
            return headers;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => warn!("Stored token is not a valid header value; sending no Authorization"),
        }
        headers
    }
}
