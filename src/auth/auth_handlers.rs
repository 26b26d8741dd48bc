use crate::{
    error::Result,
    state::{AppState, AuthMode},
};
use super::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, RefreshTokenRequest, RefreshTokenResponse};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// Register a new student account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let (user, access_token, refresh_token) = state
        .auth_service
        .register(
            payload.name.trim(),
            payload.email.trim(),
            &payload.password,
            payload.phone.trim(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            refresh_token,
            user,
        }),
    ))
}

/// Log in and receive a token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    if state.auth_service.mode() == AuthMode::Credentials {
        payload.validate()?;
    }

    let (user, access_token, refresh_token) = state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user,
    }))
}

/// Rotate a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    let (access_token, refresh_token) = state
        .auth_service
        .refresh_access_token(&payload.refresh_token)
        .await?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        refresh_token,
    }))
}

/// Logout (revoke refresh token)
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Logged out successfully")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse> {
    state.auth_service.logout(&payload.refresh_token).await?;
    Ok(StatusCode::OK)
}
