use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_session_middleware;

use crate::handlers;
use crate::services::AppointmentBook;

pub fn appointment_routes(book: Arc<AppointmentBook>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_appointments).post(handlers::create_appointment))
        .route(
            "/appointments/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        )
        .route("/appointments/{appointment_id}/completed", put(handlers::set_completed))
        .layer(middleware::from_fn_with_state(config, admin_session_middleware))
        .with_state(book)
}
