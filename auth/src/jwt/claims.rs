use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Validity window of issued tokens.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by a DateLog identity token.
///
/// `sub` is the user identifier and is always present. `couple_id` is the
/// optional pairing association; it is omitted from the encoded token when
/// absent and comes back as `None` on decode. Claims are immutable once
/// issued into a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Couple association, if the user is paired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_id: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a user with the standard expiration.
    ///
    /// Stamps `iat` with the current time and `exp` with
    /// now + [`TOKEN_TTL_DAYS`].
    pub fn for_user(user_id: impl ToString, couple_id: Option<String>) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::days(TOKEN_TTL_DAYS);

        Self {
            sub: user_id.to_string(),
            couple_id,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Check whether the claims are expired at the given timestamp.
    ///
    /// A token is still valid at exactly `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
