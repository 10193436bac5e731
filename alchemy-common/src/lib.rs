//! # Team Alchemy Common Library
//!
//! Shared code for the Team Alchemy service and CLI including:
//! - Error type
//! - Configuration loading (CLI > environment > TOML > defaults)
//! - Database initialization and row models
//! - Bearer token signing and verification
//! - Server-sent event helpers
//! - Timestamp utilities

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod sse;
pub mod time;

pub use error::{Error, Result};
