//! Authentication endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    models::user::{LoginUser, RegisterUser, UserPublic},
};

use super::bearer_token;

/// Response for register and login, carrying the user and a bearer token
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserPublic,
    pub token: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub message: String,
    pub user_id: i64,
}

/// Register a new user account
pub async fn register(
    State(state): State<crate::AppState>,
    Json(payload): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (user, token) = state.services.auth.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserPublic::from(&user),
            token,
        }),
    ))
}

/// Log in with username and password
pub async fn login(
    State(state): State<crate::AppState>,
    Json(payload): Json<LoginUser>,
) -> AppResult<Json<AuthResponse>> {
    let (user, token) = state.services.auth.login(payload).await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserPublic::from(&user),
        token,
    }))
}

/// Acknowledge a logout for a valid token.
///
/// The raw header is handed to the service: a missing or invalid token is
/// its call to reject, and stateless tokens are not revoked.
pub async fn logout(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> AppResult<Json<LogoutResponse>> {
    let token = bearer_token(&headers);
    let user_id = state.services.auth.logout(token.as_deref()).await?;

    Ok(Json(LogoutResponse {
        message: "Logout successful".to_string(),
        user_id,
    }))
}
