//! Authentication module for managing bearer credentials.
//!
//! This module provides:
//! - `CredentialStore`: key-value credential storage, with OS keychain and
//!   in-memory implementations
//! - `TokenStore`: accessors for the access/refresh token pair
//!
//! Tokens are opaque strings; the pair is always written or cleared together.

pub mod credentials;
pub mod tokens;

pub use credentials::{CredentialStore, KeyringStore, MemoryStore};
pub use tokens::TokenStore;
