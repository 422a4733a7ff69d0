use axum::{middleware, routing::get, Router};
use shared_utils::extractor::admin_session_middleware;

use crate::handlers::{download_appointments, download_departments, ExportState};

pub fn export_routes(state: ExportState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/export/appointments", get(download_appointments))
        .route("/export/departments", get(download_departments))
        .layer(middleware::from_fn_with_state(config, admin_session_middleware))
        .with_state(state)
}
