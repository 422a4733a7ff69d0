use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use tracing::debug;

use shared_models::error::AppError;
use shared_models::session::{AdminSession, SessionResponse};

use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn login(
    State(auth): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Admin login attempt");
    let response = auth.login(&request.password).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn change_password(
    State(auth): State<Arc<AuthService>>,
    Extension(_session): Extension<AdminSession>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = auth
        .change_password(&request.current_password, &request.new_password)
        .await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn session_status(
    Extension(session): Extension<AdminSession>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(SessionResponse {
        valid: true,
        day: Some(session.day),
    }))
}
