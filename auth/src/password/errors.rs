use thiserror::Error;

/// Error type for password operations.
///
/// A wrong password is not an error; `verify` reports it as `Ok(false)`.
/// These variants cover entropy failure and unparseable stored hashes only.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
