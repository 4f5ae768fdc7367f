//! Auth handlers: login, register, refresh, logout, me, and password flows.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use pos_auth::service::{LoginRequest as ServiceLogin, RegisterRequest as ServiceRegister};
use pos_core::ErrorKind;

use crate::dto::request::{
    ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest,
    VerifyEmailRequest,
};
use crate::dto::response::{
    ApiResponse, LoginResponse, LogoutResponse, MessageResponse, TokenResponse, UserResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Body returned by the reset endpoint regardless of outcome.
const RESET_ACCEPTED_MESSAGE: &str =
    "If the account exists, password reset instructions will be sent";

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()?;
    let ctx = state.request_context();

    let result = state
        .auth
        .login(
            &ctx,
            ServiceLogin {
                tenant_id: req.tenant_id,
                identity_label: req.identity_label,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(LoginResponse::from(result))))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    req.validate()?;
    let ctx = state.request_context();

    let user = state
        .auth
        .register(
            &ctx,
            ServiceRegister {
                tenant_id: req.tenant_id,
                username: req.username,
                email: req.email,
                password: req.password,
                full_name: req.full_name,
                phone: req.phone,
                role_id: req.role_id,
            },
        )
        .await?;
    let role = state.auth.find_role(&ctx, user.role_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::new(user, role))),
    ))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    req.validate()?;
    let ctx = state.request_context();
    let pair = state.auth.refresh_token(&ctx, &req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(TokenResponse::from(pair))))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<LogoutResponse>>, ApiError> {
    let ctx = state.request_context();
    let sessions_revoked = state.auth.logout(&ctx, auth.user.id).await?;
    Ok(Json(ApiResponse::ok(LogoutResponse { sessions_revoked })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let ctx = state.request_context();
    let role = state.auth.find_role(&ctx, auth.user.role_id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::new(auth.0.user, role))))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<LogoutResponse>>, ApiError> {
    req.validate()?;
    let ctx = state.request_context();
    let sessions_revoked = state
        .auth
        .change_password(&ctx, auth.user.id, &req.old_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::ok(LogoutResponse { sessions_revoked })))
}

/// POST /api/auth/reset-password
///
/// Answers 202 with the same body whether or not the label resolves to an
/// active identity.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    req.validate()?;
    let ctx = state.request_context();

    match state
        .auth
        .reset_password(&ctx, req.tenant_id, &req.identity_label)
        .await
    {
        Ok(()) => {}
        Err(e) if matches!(e.kind, ErrorKind::IdentityNotFound | ErrorKind::AccountInactive) => {
            tracing::debug!(tenant_id = %req.tenant_id, "Password reset for unknown or inactive identity");
        }
        Err(e) => return Err(e.into()),
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(MessageResponse::new(RESET_ACCEPTED_MESSAGE))),
    ))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate()?;
    let ctx = state.request_context();
    state.auth.verify_email(&ctx, &req.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Email verified"))))
}
