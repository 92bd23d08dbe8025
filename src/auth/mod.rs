use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

pub mod guard;

/// Identity claim carried by a bearer token. The token carries no role -
/// authorization always looks the role up fresh from the user store, so a
/// changed role takes effect without waiting out the token window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build a claim for `email` valid for the configured window (one hour).
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        let ttl = config::config().security.token_ttl_secs;
        Self::with_ttl(email, now.timestamp(), ttl)
    }

    pub fn with_ttl(email: impl Into<String>, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            email: email.into(),
            iat: issued_at,
            exp: (chrono::DateTime::from_timestamp(issued_at, 0).unwrap_or_else(Utc::now)
                + Duration::seconds(ttl_secs))
            .timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    /// Signature mismatch, malformed token, or missing secret
    Invalid(String),
    /// Past the validity window
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Invalid(msg) => write!(f, "invalid token: {}", msg),
            TokenError::Expired => write!(f, "token expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign a claim with the given secret.
pub fn sign(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Invalid("JWT secret not configured".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Invalid(e.to_string()))
}

/// Validate signature and expiry, returning the embedded claim.
///
/// Expiry is distinguished from other failures for diagnostics only; callers
/// surface both as the same unauthorized outcome.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Invalid("JWT secret not configured".to_string()));
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) => {
            Err(TokenError::Expired)
        }
        Err(e) => Err(TokenError::Invalid(e.to_string())),
    }
}

/// Issue a token for the given email using the process-wide secret.
///
/// Issuance is decoupled from registration: no check is made that the email
/// exists in the user store.
pub fn issue_token(email: &str) -> Result<String, TokenError> {
    sign(&Claims::new(email), &config::config().security.jwt_secret)
}

/// Verify a token against the process-wide secret.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    verify(token, &config::config().security.jwt_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_preserves_claim() {
        let claims = Claims::with_ttl("a@x.com", Utc::now().timestamp(), 3600);
        let token = sign(&claims, SECRET).unwrap();
        let decoded = verify(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        // Issued two hours ago with a one-hour window; well past default leeway
        let issued = Utc::now().timestamp() - 7200;
        let claims = Claims::with_ttl("a@x.com", issued, 3600);
        let token = sign(&claims, SECRET).unwrap();
        match verify(&token, SECRET) {
            Err(TokenError::Expired) => {}
            other => panic!("expected Expired, got {:?}", other),
        }
    }

    #[test]
    fn fresh_token_outlives_most_of_its_window() {
        // Issued 59 minutes ago it must still verify
        let issued = Utc::now().timestamp() - 59 * 60;
        let claims = Claims::with_ttl("a@x.com", issued, 3600);
        let token = sign(&claims, SECRET).unwrap();
        assert!(verify(&token, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let claims = Claims::with_ttl("a@x.com", Utc::now().timestamp(), 3600);
        let token = sign(&claims, SECRET).unwrap();
        match verify(&token, "other-secret") {
            Err(TokenError::Invalid(_)) => {}
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            verify("not-a-token", SECRET),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let claims = Claims::with_ttl("a@x.com", Utc::now().timestamp(), 3600);
        assert!(sign(&claims, "").is_err());
    }
}
