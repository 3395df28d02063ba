//! Signed marker tokens.
//!
//! Used only by [`MarkerPolicy::Signed`](crate::config::MarkerPolicy). The
//! marker cookie then carries a compact HS256 JWT instead of an arbitrary
//! value:
//!
//! ```text
//! admin_auth=<header>.<claims>.<signature>
//! ```
//!
//! The login flow that sets the cookie lives outside this crate; it calls
//! [`MarkerSigner::issue`] to mint the value.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::GateError;

/// Claims carried by a signed marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkerClaims {
    /// Who logged in.
    pub sub: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl MarkerClaims {
    /// Builds claims valid from now for `ttl`.
    #[must_use]
    pub fn new(subject: impl Into<String>, ttl: Duration) -> Self {
        let iat = OffsetDateTime::now_utc().unix_timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: subject.into(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }
}

/// Mints signed marker values.
#[derive(Clone)]
pub struct MarkerSigner {
    key: EncodingKey,
}

impl MarkerSigner {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
        }
    }

    /// Issues a marker for `subject` that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Signing` if encoding fails.
    pub fn issue(&self, subject: impl Into<String>, ttl: Duration) -> Result<String, GateError> {
        self.sign(&MarkerClaims::new(subject, ttl))
    }

    /// Signs explicit claims.
    ///
    /// # Errors
    ///
    /// Returns `GateError::Signing` if encoding fails.
    pub fn sign(&self, claims: &MarkerClaims) -> Result<String, GateError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| GateError::signing(e.to_string()))
    }
}

impl std::fmt::Debug for MarkerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerSigner").finish_non_exhaustive()
    }
}

/// Verifies signed marker values.
#[derive(Clone)]
pub struct MarkerVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl MarkerVerifier {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Checks the signature and expiry of a marker value.
    ///
    /// # Errors
    ///
    /// - `GateError::MarkerExpired` if `exp` has passed
    /// - `GateError::InvalidMarker` for any other decoding or signature failure
    pub fn verify(&self, value: &str) -> Result<MarkerClaims, GateError> {
        if value.is_empty() {
            return Err(GateError::invalid_marker("empty marker"));
        }

        let data = decode::<MarkerClaims>(value, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for MarkerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_and_verify() {
        let signer = MarkerSigner::new(SECRET);
        let verifier = MarkerVerifier::new(SECRET);

        let token = signer
            .issue("editor@example.com", Duration::from_secs(3600))
            .unwrap();
        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.sub, "editor@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_marker() {
        let signer = MarkerSigner::new(SECRET);
        let verifier = MarkerVerifier::new(SECRET);

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = MarkerClaims {
            sub: "editor".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = signer.sign(&claims).unwrap();

        assert!(matches!(verifier.verify(&token), Err(GateError::MarkerExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = MarkerSigner::new(b"another-secret-another-secret-xx");
        let verifier = MarkerVerifier::new(SECRET);

        let token = signer.issue("editor", Duration::from_secs(60)).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(GateError::InvalidMarker { .. })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let verifier = MarkerVerifier::new(SECRET);

        for value in ["", "true", "x", "a.b.c"] {
            assert!(
                matches!(verifier.verify(value), Err(GateError::InvalidMarker { .. })),
                "expected '{value}' to be rejected"
            );
        }
    }
}
