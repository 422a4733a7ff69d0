use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use shared_config::AppConfig;
use shared_utils::extractor::admin_session_middleware;

use crate::handlers::*;
use crate::models::MAX_PHOTO_BYTES;
use crate::services::DepartmentBoard;

// Base64 inflates the payload by a third; leave room for the JSON envelope.
const PHOTO_BODY_LIMIT: usize = MAX_PHOTO_BYTES / 3 * 4 + 64 * 1024;

pub fn department_routes(board: Arc<DepartmentBoard>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/departments", get(get_board).post(create_department))
        .route("/departments/progress", get(get_progress))
        .route("/departments/reorder", post(reorder_departments))
        .route("/departments/{id}", put(rename_department).delete(delete_department))
        .route("/departments/{id}/sub-department-mode", put(set_sub_department_mode))
        .route("/departments/{id}/sub-departments", post(create_sub_department))
        .route("/departments/{id}/patients", post(create_patient))
        .route("/departments/{id}/patients/reorder", post(reorder_patients))
        .route("/sub-departments/{id}", put(rename_sub_department).delete(delete_sub_department))
        .route("/patients/{id}", put(update_patient).delete(delete_patient))
        .route("/patients/{id}/status", put(update_patient_status))
        .route("/patients/{id}/entries", post(add_entry))
        .route("/patients/{id}/entries/{entry_id}", put(update_entry).delete(remove_entry))
        .route(
            "/patients/{id}/photos",
            post(upload_photo).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .route("/photos/{id}", delete(delete_photo))
        .layer(middleware::from_fn_with_state(config, admin_session_middleware))
        .with_state(board)
}
