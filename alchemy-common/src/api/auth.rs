//! Bearer token signing and verification
//!
//! Token format: `{user_id}.{expires_at}.{signature}` where `expires_at`
//! is a Unix timestamp in seconds and `signature` is the lowercase hex
//! SHA-256 of `{user_id}.{expires_at}.{secret_key}`.
//!
//! Tokens carry no other state, so any process sharing `SECRET_KEY`
//! (server, CLI) can issue and check them.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiAuthError {
    /// No `Authorization: Bearer` header
    #[error("Missing bearer token")]
    MissingToken,

    /// Token does not have the three dot-separated parts
    #[error("Malformed token")]
    Malformed,

    /// Token lifetime has passed
    #[error("Token expired at {expires_at} (now {now})")]
    Expired { expires_at: i64, now: i64 },

    /// Signature does not match the claims
    #[error("Invalid token signature")]
    InvalidSignature,
}

/// Claims carried by a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub expires_at: i64,
}

/// Current Unix time in seconds
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// ========================================
// Signing
// ========================================

/// Signature for a set of claims
///
/// # Examples
///
/// ```
/// use alchemy_common::api::auth::sign_claims;
///
/// let sig = sign_claims("secret", 7, 1_900_000_000);
/// assert_eq!(sig.len(), 64); // SHA-256 is 64 hex chars
/// assert_ne!(sig, sign_claims("other", 7, 1_900_000_000));
/// ```
pub fn sign_claims(secret_key: &str, user_id: i64, expires_at: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}.{}.{}", user_id, expires_at, secret_key).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issue a token for `user_id` valid for `ttl_minutes` from `now`
pub fn issue_token(secret_key: &str, user_id: i64, now: i64, ttl_minutes: i64) -> String {
    let expires_at = now.saturating_add(ttl_minutes.saturating_mul(60));
    format!(
        "{}.{}.{}",
        user_id,
        expires_at,
        sign_claims(secret_key, user_id, expires_at)
    )
}

/// Verify a token at time `now`
///
/// # Examples
///
/// ```
/// use alchemy_common::api::auth::{issue_token, verify_token};
///
/// let token = issue_token("secret", 1, 1_000, 30);
/// let claims = verify_token("secret", &token, 1_000).unwrap();
/// assert_eq!(claims.user_id, 1);
/// assert!(verify_token("secret", &token, 1_000 + 31 * 60).is_err());
/// ```
pub fn verify_token(secret_key: &str, token: &str, now: i64) -> Result<TokenClaims, ApiAuthError> {
    let mut parts = token.trim().splitn(3, '.');
    let (user_id, expires_at, signature) = match (parts.next(), parts.next(), parts.next()) {
        (Some(u), Some(e), Some(s)) if !s.is_empty() => (u, e, s),
        _ => return Err(ApiAuthError::Malformed),
    };

    let user_id: i64 = user_id.parse().map_err(|_| ApiAuthError::Malformed)?;
    let expires_at: i64 = expires_at.parse().map_err(|_| ApiAuthError::Malformed)?;

    let expected = sign_claims(secret_key, user_id, expires_at);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(ApiAuthError::InvalidSignature);
    }

    if now >= expires_at {
        return Err(ApiAuthError::Expired { expires_at, now });
    }

    Ok(TokenClaims { user_id, expires_at })
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header_value: &str) -> Result<&str, ApiAuthError> {
    let (scheme, token) = header_value
        .trim()
        .split_once(' ')
        .ok_or(ApiAuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiAuthError::MissingToken);
    }
    Ok(token.trim())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = issue_token("k", 42, 10_000, 30);
        let claims = verify_token("k", &token, 10_001).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.expires_at, 10_000 + 1800);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let token = issue_token("k", 42, 10_000, i64::MAX);
        let claims = verify_token("k", &token, 10_001).unwrap();
        assert_eq!(claims.expires_at, i64::MAX);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("k", 42, 10_000, 30);
        assert_eq!(
            verify_token("other", &token, 10_001),
            Err(ApiAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_user_rejected() {
        let token = issue_token("k", 42, 10_000, 30);
        let tampered = token.replacen("42", "43", 1);
        assert_eq!(
            verify_token("k", &tampered, 10_001),
            Err(ApiAuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token("k", 1, 0, 1);
        assert!(matches!(
            verify_token("k", &token, 60),
            Err(ApiAuthError::Expired { expires_at: 60, now: 60 })
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "1.2", "x.2.sig", "1.y.sig", "1.2."] {
            assert_eq!(verify_token("k", token, 0), Err(ApiAuthError::Malformed), "{}", token);
        }
    }

    #[test]
    fn test_bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(bearer_token("bearer  abc ").unwrap(), "abc");
        assert!(bearer_token("Basic abc").is_err());
        assert!(bearer_token("Bearer").is_err());
    }
}
