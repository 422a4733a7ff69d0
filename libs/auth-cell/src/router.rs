use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_utils::extractor::admin_session_middleware;

use crate::handlers;
use crate::services::AuthService;

pub fn auth_routes(auth: Arc<AuthService>) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/auth/password", post(handlers::change_password))
        .route("/auth/session", get(handlers::session_status))
        .layer(middleware::from_fn_with_state(auth.config().clone(), admin_session_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(auth)
}
