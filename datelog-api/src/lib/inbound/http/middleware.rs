use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::inbound::http::router::AppState;

/// Authenticated identity attached to the request after the guard accepts it.
///
/// Downstream handlers read identity from here and only from here; client
/// supplied identifiers in bodies or query strings are never trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub couple_id: Option<String>,
}

/// Why the guard refused a request.
///
/// Everything except `TokenExpired` is reported to the client as a generic
/// `UNAUTHORIZED`; expiry gets its own code so clients can re-login instead
/// of treating the token as garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// Authorization header absent or not valid UTF-8
    MissingHeader,
    /// Header present but not exactly `Bearer <token>`
    MalformedHeader,
    /// Token is malformed or its signature does not check out
    InvalidToken,
    /// Token is valid but past its expiration
    TokenExpired,
    /// Token verified but its claims fail the sanity check
    InvalidPayload,
}

impl AuthRejection {
    fn code(&self) -> &'static str {
        match self {
            AuthRejection::TokenExpired => "TOKEN_EXPIRED",
            _ => "UNAUTHORIZED",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "Missing Authorization header",
            AuthRejection::MalformedHeader => {
                "Missing or invalid Authorization header (expected: Bearer <token>)"
            }
            AuthRejection::InvalidToken => "Invalid token",
            AuthRejection::TokenExpired => "Token expired",
            AuthRejection::InvalidPayload => "Invalid token payload",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": {
                    "code": self.code(),
                    "message": self.message(),
                }
            })),
        )
            .into_response()
    }
}

/// Guard in front of every protected route.
///
/// Extracts the bearer token, verifies it, and attaches an
/// [`AuthenticatedUser`] to the request. Rejections short-circuit before any
/// protected handler runs; each request is evaluated independently with no
/// retry.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_bearer_token(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token rejected");
        match e {
            auth::JwtError::Expired => AuthRejection::TokenExpired,
            _ => AuthRejection::InvalidToken,
        }
    })?;

    // Belt and suspenders: the token layer already requires `sub`, but never
    // let an empty subject through to handlers.
    if claims.sub.is_empty() {
        tracing::warn!("Token accepted but subject claim is empty");
        return Err(AuthRejection::InvalidPayload);
    }

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        couple_id: claims.couple_id,
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, AuthRejection> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingHeader)?;

    let header = header
        .to_str()
        .map_err(|_| AuthRejection::MissingHeader)?;

    parse_bearer(header)
}

/// Parse an `Authorization` header value into the bearer credential.
///
/// Accepts exactly a scheme and a credential separated by one or more
/// whitespace characters; the scheme match is case-insensitive.
fn parse_bearer(header: &str) -> Result<&str, AuthRejection> {
    let mut parts = header.split_whitespace();

    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthRejection::MalformedHeader),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthRejection::MalformedHeader);
    }

    Ok(token)
}
