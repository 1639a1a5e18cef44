//! API client for communicating with the Spendtrack services.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests to the auth, expense, and message-processing endpoints. All
//! requests funnel through a single primitive that injects the bearer
//! token and runs the refresh-and-retry protocol on expired sessions.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::{CredentialStore, KeyringStore, TokenStore};
use crate::config::{ApiConfig, Endpoint};
use crate::models::{AuthTokens, Expense, NewExpense, SignupRequest};
use crate::transport::{
    ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};

use super::error::ApiError;
use super::outcome::{Body, Outcome};

/// Error surfaced when the refresh protocol is exhausted and the caller
/// must authenticate again.
const SESSION_EXPIRED_MSG: &str = "Session expired. Please login again.";

/// Error surfaced when an operation requires a session and none exists.
const NOT_AUTHENTICATED_MSG: &str = "User not authenticated";

/// AJAX-identifying header expected by the API gateway
const REQUESTED_WITH_HEADER: HeaderName = HeaderName::from_static("x-requested-with");

/// Header carrying the caller's identifier to the message-processing service
const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Whether an expired-session response may trigger the refresh protocol.
///
/// Login and signup use `Never`: a 401 there means bad credentials, not an
/// expired session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    Auto,
    Never,
}

/// Retry state of one logical request. The only transition is
/// `Initial -> RetryingAfterRefresh`, guarded by an unauthorized response
/// and a successful refresh, so at most one retry can ever happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    RetryingAfterRefresh,
}

/// Client for the Spendtrack API with transparent session refresh.
///
/// Dependencies are injected: a `Transport` to put requests on the wire and
/// a `CredentialStore` holding the token pair. Every operation returns an
/// `Outcome` and never panics or propagates an error to the caller.
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens: TokenStore::new(store),
        }
    }

    /// Client with the production transport and the OS keychain store.
    pub fn with_defaults(config: ApiConfig) -> Result<Self, TransportError> {
        Ok(Self::new(
            config,
            Arc::new(ReqwestTransport::new()?),
            Arc::new(KeyringStore::new()),
        ))
    }

    // ===== Authenticated request primitive =====

    /// Issue a request with bearer injection and the refresh-and-retry
    /// protocol. This is the chokepoint every domain operation goes
    /// through; it never returns an error, only an `Outcome`.
    pub async fn execute(
        &self,
        endpoint: Endpoint,
        method: Method,
        extra_headers: HeaderMap,
        body: Option<Value>,
        refresh: RefreshPolicy,
    ) -> Outcome<Body> {
        let mut attempt = Attempt::Initial;
        loop {
            let response = match self
                .send_once(endpoint, method.clone(), &extra_headers, body.as_ref())
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(endpoint = endpoint.path(), error = %e, "request failed without a response");
                    return Outcome::transport_failure(e.to_string());
                }
            };

            if response.status == StatusCode::UNAUTHORIZED
                && refresh == RefreshPolicy::Auto
                && attempt == Attempt::Initial
            {
                if self.refresh_session().await {
                    debug!(endpoint = endpoint.path(), "session refreshed, retrying request");
                    attempt = Attempt::RetryingAfterRefresh;
                    continue;
                }

                if let Err(e) = self.tokens.clear() {
                    warn!(error = %e, "failed to clear credentials after refresh failure");
                }
                return Outcome::failure(response.status.as_u16(), SESSION_EXPIRED_MSG);
            }

            return Self::interpret(response);
        }
    }

    /// Exchange the stored refresh token for a new token pair. Returns
    /// whether the exchange succeeded; the store is only mutated on
    /// success.
    pub async fn refresh_session(&self) -> bool {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            debug!("no refresh token stored, skipping refresh");
            return false;
        };

        let headers = match self.standard_headers(false) {
            Ok(headers) => headers,
            Err(e) => {
                warn!(error = %e, "failed to build refresh request");
                return false;
            }
        };

        let request = TransportRequest {
            method: Method::POST,
            url: self.config.url(Endpoint::RefreshToken),
            headers,
            body: Some(json!({ "token": refresh_token }).to_string()),
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "refresh request failed");
                return false;
            }
        };

        if !response.status.is_success() {
            debug!(status = %response.status, "refresh rejected");
            return false;
        }

        let tokens: AuthTokens = match serde_json::from_str(&response.body) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "malformed refresh response");
                return false;
            }
        };

        match self
            .tokens
            .store_pair(&tokens.access_token, &tokens.refresh_token)
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to store refreshed tokens");
                false
            }
        }
    }

    async fn send_once(
        &self,
        endpoint: Endpoint,
        method: Method,
        extra_headers: &HeaderMap,
        body: Option<&Value>,
    ) -> Result<TransportResponse, ApiError> {
        let mut headers = self.standard_headers(true)?;
        for (name, value) in extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        let request = TransportRequest {
            method,
            url: self.config.url(endpoint),
            headers,
            body: body.map(Value::to_string),
        };
        Ok(self.transport.send(request).await?)
    }

    /// Headers sent on every request. The bearer token is attached only
    /// when one is stored and the request is an authenticated one.
    fn standard_headers(&self, authenticated: bool) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            REQUESTED_WITH_HEADER,
            HeaderValue::from_static("XMLHttpRequest"),
        );

        if authenticated {
            if let Some(token) = self.tokens.access_token() {
                headers.insert(
                    header::AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}"))?,
                );
            }
        }
        Ok(headers)
    }

    /// Map a raw response to an outcome: parse the payload per its content
    /// type, then surface either the data or an error message.
    fn interpret(response: TransportResponse) -> Outcome<Body> {
        let status = response.status.as_u16();
        let is_json = response
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let data = if is_json {
            if response.body.is_empty() {
                None
            } else {
                match serde_json::from_str(&response.body) {
                    Ok(value) => Some(Body::Json(value)),
                    Err(e) => {
                        return Outcome::transport_failure(format!(
                            "malformed response body: {e}"
                        ))
                    }
                }
            }
        } else {
            Some(Body::Text(response.body))
        };

        if !response.status.is_success() {
            let message = data
                .as_ref()
                .and_then(Body::server_message)
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            return Outcome::failure(status, message);
        }

        Outcome::success(status, data)
    }

    // ===== Domain operations =====

    /// Authenticate with username and password. On success the returned
    /// token pair is stored before the outcome is returned.
    pub async fn login(&self, username: &str, password: &str) -> Outcome<AuthTokens> {
        let body = json!({ "username": username, "password": password });
        let outcome = self
            .execute(
                Endpoint::Login,
                Method::POST,
                HeaderMap::new(),
                Some(body),
                RefreshPolicy::Never,
            )
            .await
            .into_json();
        self.store_tokens(&outcome);
        outcome
    }

    /// Create an account. Same token-storage behavior as `login`.
    pub async fn signup(&self, profile: &SignupRequest) -> Outcome<AuthTokens> {
        let body = match serde_json::to_value(profile) {
            Ok(body) => body,
            Err(e) => return Outcome::transport_failure(ApiError::from(e).to_string()),
        };
        let outcome = self
            .execute(
                Endpoint::Signup,
                Method::POST,
                HeaderMap::new(),
                Some(body),
                RefreshPolicy::Never,
            )
            .await
            .into_json();
        self.store_tokens(&outcome);
        outcome
    }

    /// Whether the stored session is currently valid. True only when the
    /// session check returns 200 with a canonical user identifier as the
    /// body; every failure path resolves to false.
    pub async fn is_logged_in(&self) -> bool {
        let outcome = self
            .execute(
                Endpoint::Ping,
                Method::GET,
                HeaderMap::new(),
                None,
                RefreshPolicy::Auto,
            )
            .await
            .into_text();

        if outcome.status != 200 {
            return false;
        }
        outcome
            .data
            .is_some_and(|body| Self::is_valid_user_id(body.trim()))
    }

    /// Fetch the caller's expenses
    pub async fn get_expenses(&self) -> Outcome<Vec<Expense>> {
        self.execute(
            Endpoint::GetExpenses,
            Method::GET,
            HeaderMap::new(),
            None,
            RefreshPolicy::Auto,
        )
        .await
        .into_json()
    }

    /// Record a new expense
    pub async fn add_expense(&self, expense: &NewExpense) -> Outcome<bool> {
        let body = match serde_json::to_value(expense) {
            Ok(body) => body,
            Err(e) => return Outcome::transport_failure(ApiError::from(e).to_string()),
        };
        self.execute(
            Endpoint::AddExpense,
            Method::POST,
            HeaderMap::new(),
            Some(body),
            RefreshPolicy::Auto,
        )
        .await
        .into_json()
    }

    /// Forward a message to the processing service. The caller's identifier
    /// is obtained from the session check first; without one the target
    /// endpoint is never contacted.
    pub async fn process_message(&self, message: &str) -> Outcome<Value> {
        let ping = self
            .execute(
                Endpoint::Ping,
                Method::GET,
                HeaderMap::new(),
                None,
                RefreshPolicy::Auto,
            )
            .await
            .into_text();

        let user_id = match ping.data.map(|body| body.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => return Outcome::failure(401, NOT_AUTHENTICATED_MSG),
        };

        let mut headers = HeaderMap::new();
        let value = match HeaderValue::from_str(&user_id) {
            Ok(value) => value,
            Err(e) => return Outcome::transport_failure(ApiError::from(e).to_string()),
        };
        headers.insert(USER_ID_HEADER, value);

        self.execute(
            Endpoint::ProcessMessage,
            Method::POST,
            headers,
            Some(json!({ "message": message })),
            RefreshPolicy::Auto,
        )
        .await
        .into_json()
    }

    /// Drop the stored session
    pub fn logout(&self) -> anyhow::Result<()> {
        self.tokens.clear()
    }

    fn store_tokens(&self, outcome: &Outcome<AuthTokens>) {
        if let Some(tokens) = &outcome.data {
            if let Err(e) = self
                .tokens
                .store_pair(&tokens.access_token, &tokens.refresh_token)
            {
                warn!(error = %e, "failed to store tokens");
            }
        }
    }

    /// Validate that a string looks like a canonical user identifier:
    /// 36 characters with dashes, xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
    fn is_valid_user_id(s: &str) -> bool {
        if s.len() != 36 {
            return false;
        }
        s.chars().enumerate().all(|(i, c)| {
            if i == 8 || i == 13 || i == 18 || i == 23 {
                c == '-'
            } else {
                c.is_ascii_hexdigit()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_user_id() {
        // Valid identifiers
        assert!(ApiClient::is_valid_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(ApiClient::is_valid_user_id("3FA85F64-5717-4562-B3FC-2C963F66AFA6")); // uppercase
        assert!(ApiClient::is_valid_user_id("00000000-0000-0000-0000-000000000000"));

        // Invalid identifiers
        assert!(!ApiClient::is_valid_user_id("")); // empty
        assert!(!ApiClient::is_valid_user_id("not-a-uuid")); // too short
        assert!(!ApiClient::is_valid_user_id("3fa85f6457174562b3fc2c963f66afa6")); // no dashes
        assert!(!ApiClient::is_valid_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa")); // too short
        assert!(!ApiClient::is_valid_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa67")); // too long
        assert!(!ApiClient::is_valid_user_id("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz")); // invalid chars
    }
}
