use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let email = body.email.trim().to_lowercase();

    let user = state
        .user_service
        .verify_credentials(&email, &body.password)
        .await
        .map_err(ApiError::from)?;

    let claims = auth::Claims::for_user(user.id, user.couple_id.clone());
    let token = state.authenticator.generate_token(&claims).map_err(|e| {
        ApiError::InternalServerError(format!("Token generation failed: {}", e))
    })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token,
            user: (&user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: UserData,
}
