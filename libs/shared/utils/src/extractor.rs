use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
    body::Body,
};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::session::AdminSession;

use crate::session::{clinic_today, validate_session_token};

pub fn bearer_token(value: Option<&http::HeaderValue>) -> Result<String, AppError> {
    let auth_header = value
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

// Middleware guarding admin routes with the daily session token
pub async fn admin_session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers().get(http::header::AUTHORIZATION))?;

    let today = clinic_today(config.utc_offset_hours);
    let session = validate_session_token(&token, &config.session_secret, today)
        .map_err(AppError::Auth)?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

pub fn extract_session<B>(request: &Request<B>) -> Result<AdminSession, AppError> {
    request
        .extensions()
        .get::<AdminSession>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Session not found in request extensions".to_string()))
}
