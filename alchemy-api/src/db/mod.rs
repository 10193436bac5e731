//! Query layer
//!
//! Thin async functions over the shared pool. Rows come back in storage
//! form from `alchemy_common::db::models`; conversions to the domain
//! types live next to the queries that need them.

pub mod analyses;
pub mod assessments;
pub mod teams;
pub mod users;

use alchemy_common::Error;

/// True when the error is a UNIQUE or PRIMARY KEY constraint failure
pub fn is_unique_violation(err: &Error) -> bool {
    match err {
        Error::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    }
}

/// Decode a JSON column, reporting the column on failure
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    column: &str,
    text: &str,
) -> alchemy_common::Result<T> {
    serde_json::from_str(text)
        .map_err(|e| Error::Internal(format!("Corrupt JSON in column {}: {}", column, e)))
}
