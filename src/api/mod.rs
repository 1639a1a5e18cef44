//! REST API client module for the Spendtrack services.
//!
//! This module provides the `ApiClient` for communicating with the auth,
//! expense, and message-processing services behind the API gateway.
//!
//! The API uses bearer token authentication with a refresh-token flow:
//! an expired-session response triggers one refresh attempt and one retry
//! of the original request before the client gives up and clears the
//! stored credentials.

pub mod client;
pub mod error;
pub mod outcome;

pub use client::{ApiClient, RefreshPolicy};
pub use error::ApiError;
pub use outcome::{Body, Outcome};
