//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while issuing or verifying API tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// Token is not `<subject>.<expiry>.<signature>`.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Signature does not match the token body.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token expiry is in the past.
    #[error("token expired")]
    Expired,

    /// Subject is empty or contains the separator.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    /// Expiry falls outside the representable date range.
    #[error("token lifetime out of range")]
    ExpiryOutOfRange,

    /// HMAC key could not be initialised.
    #[error("signing key error: {0}")]
    Key(String),
}
