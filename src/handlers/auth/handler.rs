//! Authentication handler implementations

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    models::User,
    services::{auth_service::IssuedToken, AuthService},
    state::AppState,
};

use super::{
    request::{LoginRequest, RegisterRequest},
    response::{AuthResponse, CurrentUserResponse, LogoutResponse},
};

fn auth_response(user: User, issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        user: user.into(),
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }
}

/// Register a new user and sign them in
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;

    let user = AuthService::register(
        state.storage(),
        payload.name.trim(),
        &payload.email,
        &payload.password,
    )
    .await?;
    let issued = AuthService::issue_token(&user, &state.config().jwt)?;

    Ok((StatusCode::CREATED, Json(auth_response(user, issued))))
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let (user, issued) = AuthService::login(
        state.storage(),
        &state.config().jwt,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(auth_response(user, issued)))
}

/// Logout; tokens are stateless so the client simply discards it
pub async fn logout(auth_user: AuthenticatedUser) -> Json<LogoutResponse> {
    tracing::debug!(user_id = %auth_user.id, "User logged out");

    Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Get current authenticated user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<CurrentUserResponse>> {
    let user = state
        .storage()
        .find_user_by_id(&auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(CurrentUserResponse { user: user.into() }))
}
