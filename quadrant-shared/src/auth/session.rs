/// Signed session tokens
///
/// A login produces an HS256-signed token that the API stores in an HttpOnly
/// cookie. The token carries only the user id and its validity window; there
/// is no server-side session table. Logging out drops the cookie.
///
/// # Claims
///
/// - `sub`: user id (decimal string)
/// - `iss`: always `"quadrant"`
/// - `iat` / `nbf` / `exp`: Unix timestamps
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use quadrant_shared::auth::session::{issue_token, validate_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-session-secret-of-at-least-32-bytes";
/// let token = issue_token(&SessionClaims::new(42, Duration::hours(1)), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.user_id()?, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer stamped into every session token
pub const SESSION_ISSUER: &str = "quadrant";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to sign a token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Token is past its `exp`
    #[error("Session has expired")]
    Expired,

    /// Bad signature, issuer, or shape
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,

    pub iss: String,

    pub iat: i64,

    pub nbf: i64,

    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user_id`, valid from now for `ttl`
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<i64, SessionError> {
        self.sub
            .parse()
            .map_err(|_| SessionError::Invalid(format!("non-numeric subject: {}", self.sub)))
    }
}

/// Signs claims with HS256
pub fn issue_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| SessionError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, and validity window
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_validate() {
        let token = issue_token(&SessionClaims::new(7, Duration::hours(1)), SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.iss, SESSION_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(&SessionClaims::new(7, Duration::hours(1)), SECRET).unwrap();
        let result = validate_token(&token, "another-secret-key-that-is-32-bytes!!");

        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Well beyond the default 60s leeway
        let token = issue_token(&SessionClaims::new(7, Duration::hours(-2)), SECRET).unwrap();
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(SessionError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let mut claims = SessionClaims::new(7, Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = issue_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = SessionClaims::new(7, Duration::hours(1));
        claims.sub = "alice".to_string();

        assert!(claims.user_id().is_err());
    }
}
