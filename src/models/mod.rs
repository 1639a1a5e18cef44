//! Data models for the Spendtrack wire contract.
//!
//! - `AuthTokens`: token pair returned by login, signup, and refresh
//! - `SignupRequest`: profile fields for account creation
//! - `Expense`, `NewExpense`: expense records as listed and created

pub mod auth;
pub mod expense;

pub use auth::{AuthTokens, SignupRequest};
pub use expense::{Expense, NewExpense};
