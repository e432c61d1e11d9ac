//! API token issuing and verification.
//!
//! Tokens have the form `<subject>.<expiry>.<signature>` where `expiry` is a
//! Unix timestamp in seconds and `signature` is the hex HMAC-SHA256 of
//! `<subject>.<expiry>` under the configured secret.

mod error;

pub use error::AuthError;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::instrument;

const SEPARATOR: char = '.';

/// A verified token's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies API tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    /// Create a signer over `secret`.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for `subject` valid for `ttl` from `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidSubject` if the subject is empty or contains
    /// `.`, and `AuthError::ExpiryOutOfRange` if `now + ttl` overflows.
    pub fn issue(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let subject = subject.trim();
        if subject.is_empty() || subject.contains(SEPARATOR) {
            return Err(AuthError::InvalidSubject(subject.to_owned()));
        }

        let expiry = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::ExpiryOutOfRange)?
            .timestamp();
        let body = format!("{subject}{SEPARATOR}{expiry}");
        let signature = self.sign(&body)?;
        Ok(format!("{body}{SEPARATOR}{signature}"))
    }

    /// Verify `token` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `Malformed`, `InvalidSignature`, or `Expired`.
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let (body, signature) = token
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| AuthError::Malformed("missing signature".to_owned()))?;
        let (subject, expiry) = body
            .split_once(SEPARATOR)
            .ok_or_else(|| AuthError::Malformed("missing expiry".to_owned()))?;

        if subject.is_empty() {
            return Err(AuthError::Malformed("empty subject".to_owned()));
        }
        let expiry: i64 = expiry
            .parse()
            .map_err(|_| AuthError::Malformed("expiry is not a timestamp".to_owned()))?;

        let expected = self.sign(body)?;
        if !constant_time_compare(&expected, signature) {
            return Err(AuthError::InvalidSignature);
        }

        let expires_at = DateTime::from_timestamp(expiry, 0)
            .ok_or_else(|| AuthError::Malformed("expiry out of range".to_owned()))?;
        if expires_at <= now {
            return Err(AuthError::Expired);
        }

        Ok(TokenClaims {
            subject: subject.to_owned(),
            expires_at,
        })
    }

    fn sign(&self, body: &str) -> Result<String, AuthError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::Key(e.to_string()))?;
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(SecretString::from("k8Jq2mVx9Lr4Tz7Wn3Pb6Yc1Hd5Gf0Sa".to_owned()))
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_792_281_600, 0).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let token = signer().issue("front-desk", Duration::hours(1), now()).unwrap();
        let claims = signer().verify(&token, now()).unwrap();

        assert_eq!(claims.subject, "front-desk");
        assert_eq!(claims.expires_at, now() + Duration::hours(1));
    }

    #[test]
    fn test_expired_token() {
        let token = signer().issue("front-desk", Duration::hours(1), now()).unwrap();
        let later = now() + Duration::hours(2);

        assert!(matches!(
            signer().verify(&token, later),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_tampered_subject() {
        let token = signer().issue("front-desk", Duration::hours(1), now()).unwrap();
        let forged = token.replacen("front-desk", "owner", 1);

        assert!(matches!(
            signer().verify(&forged, now()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().issue("front-desk", Duration::hours(1), now()).unwrap();
        let other = TokenSigner::new(SecretString::from("another-secret-entirely-0123456789".to_owned()));

        assert!(matches!(
            other.verify(&token, now()),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "abc.def", ".123.sig", "abc.notanumber.sig"] {
            assert!(
                matches!(signer().verify(token, now()), Err(AuthError::Malformed(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_subject_with_separator_rejected() {
        assert!(matches!(
            signer().issue("a.b", Duration::hours(1), now()),
            Err(AuthError::InvalidSubject(_))
        ));
    }

    #[test]
    fn test_huge_ttl_rejected() {
        let ttl = Duration::try_hours(10_000_000_000).unwrap();
        assert!(matches!(
            signer().issue("front-desk", ttl, now()),
            Err(AuthError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("k8Jq2m"));
    }
}
