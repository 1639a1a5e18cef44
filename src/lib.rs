//! Client library for the Spendtrack expense service.
//!
//! The crate centers on [`ApiClient`], a sessioned HTTP client that injects
//! a stored bearer token into every request, detects expired-session
//! responses, transparently refreshes the token pair once, and retries the
//! original request exactly once before giving up and clearing the stored
//! credentials.
//!
//! Collaborators are injected: a [`Transport`] puts requests on the wire
//! (production: [`ReqwestTransport`]) and a [`CredentialStore`] persists the
//! token pair (production: [`KeyringStore`] on the OS keychain;
//! [`MemoryStore`] for tests and ephemeral sessions).
//!
//! Every operation returns an [`Outcome`] - status, optional data, optional
//! error - and never propagates a raised error to the caller.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod transport;

pub use api::{ApiClient, ApiError, Body, Outcome, RefreshPolicy};
pub use auth::{CredentialStore, KeyringStore, MemoryStore, TokenStore};
pub use config::{ApiConfig, Endpoint};
pub use models::{AuthTokens, Expense, NewExpense, SignupRequest};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
