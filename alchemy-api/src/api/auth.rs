//! Bearer-token authentication middleware
//!
//! With `require_auth` off every request passes. With it on, mutating
//! methods (POST, PUT, PATCH, DELETE) need `Authorization: Bearer <token>`
//! signed with the configured secret key; reads stay public. Verified
//! claims are attached to the request extensions.

use alchemy_common::api::{bearer_token, unix_now, verify_token, ApiAuthError, TokenClaims};
use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";

fn requires_token(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn check(secret_key: &str, request: &Request) -> Result<TokenClaims, ApiAuthError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiAuthError::MissingToken)?;
    let token = bearer_token(header_value)?;
    verify_token(secret_key, token, unix_now())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.settings.require_auth || !requires_token(request.method()) {
        return Ok(next.run(request).await);
    }

    match check(&state.settings.secret_key, &request) {
        Ok(claims) => {
            debug!(user_id = claims.user_id, "Authenticated request");
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(method = %request.method(), uri = %request.uri(), "Rejected request: {}", e);
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_mutating_methods_need_token() {
        assert!(requires_token(&Method::POST));
        assert!(requires_token(&Method::DELETE));
        assert!(!requires_token(&Method::GET));
        assert!(!requires_token(&Method::OPTIONS));
    }
}
