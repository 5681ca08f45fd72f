use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Issues and verifies signed identity tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single process-wide secret.
/// Verification is a pure function of (token, secret, current time): it never
/// mutates anything and the embedded claims come back exactly as issued.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new handler from the signing secret.
    ///
    /// The secret should be at least 256 bits (32 bytes) for HS256 and must
    /// come from configuration, never from code.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// The signature is checked before any claim is deserialized, so a
    /// tampered token never yields claims. Expiration is checked with zero
    /// leeway; a token is accepted up to and including its `exp` instant.
    ///
    /// # Errors
    /// * `Malformed` - Token structure could not be parsed
    /// * `InvalidSignature` - Signature does not match the payload
    /// * `Expired` - Token is past its expiration
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
