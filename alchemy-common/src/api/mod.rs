//! Shared HTTP API functionality
//!
//! Pure functions only; the axum middleware wrapping them lives in the
//! service crate.

pub mod auth;

pub use auth::{
    bearer_token, issue_token, sign_claims, unix_now, verify_token, ApiAuthError, TokenClaims,
};
