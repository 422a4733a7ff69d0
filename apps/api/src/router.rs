use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use appointment_cell::{appointment_routes, AppointmentBook};
use auth_cell::{auth_routes, AuthService};
use department_cell::{department_routes, DepartmentBoard};
use export_cell::{export_routes, ExportState};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::extractor::admin_session_middleware;
use sync_cell::ToastLog;
use weekly_slot_cell::{weekly_slot_routes, WeeklyPlanner};

pub struct Services {
    pub config: Arc<AppConfig>,
    pub toasts: Arc<ToastLog>,
    pub auth: Arc<AuthService>,
    pub departments: Arc<DepartmentBoard>,
    pub appointments: Arc<AppointmentBook>,
    pub weekly_slots: Arc<WeeklyPlanner>,
}

#[axum::debug_handler]
async fn drain_notifications(State(toasts): State<Arc<ToastLog>>) -> Result<Json<Value>, AppError> {
    let notifications = toasts.drain().await;

    Ok(Json(json!({
        "notifications": notifications,
        "total": notifications.len()
    })))
}

pub fn create_router(services: Services) -> Router {
    let notification_routes = Router::new()
        .route("/notifications", get(drain_notifications))
        .layer(middleware::from_fn_with_state(services.config.clone(), admin_session_middleware))
        .with_state(services.toasts.clone());

    let export_state = ExportState {
        departments: services.departments.clone(),
        appointments: services.appointments.clone(),
        config: services.config.clone(),
    };

    Router::new()
        .route("/", get(|| async { "Dental admin API is running!" }))
        .merge(auth_routes(services.auth))
        .merge(department_routes(services.departments, services.config.clone()))
        .merge(appointment_routes(services.appointments, services.config.clone()))
        .merge(weekly_slot_routes(services.weekly_slots, services.config.clone()))
        .merge(export_routes(export_state))
        .merge(notification_routes)
}
