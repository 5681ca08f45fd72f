use thiserror::Error;

/// Error type for token operations.
///
/// `Expired` is deliberately its own variant: callers surface it to clients
/// as a distinct outcome so an expired login can be renewed instead of being
/// treated like a tampered token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}
