//! Shared-secret sign-in.
//!
//! The token is an HS256 JWT over empty claims, keyed by the configured
//! password. It is fully determined by the password, so checking a request
//! means recomputing the token and comparing strings.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::ApiError;
use crate::AppState;

pub const TOKEN_COOKIE: &str = "token";

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const JWT_CLAIMS: &str = "{}";

type HmacSha256 = Hmac<Sha256>;

/// Builds the token handed out on successful sign-in.
pub fn issue_token(secret: &str) -> Result<String, ApiError> {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(JWT_HEADER),
        URL_SAFE_NO_PAD.encode(JWT_CLAIMS)
    );

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// Rejects requests whose `token` cookie does not match the token for the
/// configured secret. Passes everything through when no secret is set.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = state.secret() else {
        return Ok(next.run(request).await);
    };

    let expected = issue_token(secret)?;
    let authorized = jar
        .get(TOKEN_COOKIE)
        .is_some_and(|cookie| cookie.value() == expected);

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without a valid token");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_deterministic() {
        assert_eq!(issue_token("hunter2").unwrap(), issue_token("hunter2").unwrap());
        assert_ne!(issue_token("hunter2").unwrap(), issue_token("hunter3").unwrap());
    }

    #[test]
    fn test_token_shape() {
        let token = issue_token("secret").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(parts[1], "e30");
        assert!(!token.contains('='));
    }
}
