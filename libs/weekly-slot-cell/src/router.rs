use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, put},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::admin_session_middleware;

use crate::handlers;
use crate::services::WeeklyPlanner;

/// Every route takes an optional `?week=YYYY-Www`; without it the recurring
/// template is addressed.
pub fn weekly_slot_routes(planner: Arc<WeeklyPlanner>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/weekly-slots", get(handlers::get_week).post(handlers::create_slot))
        .route("/weekly-slots/{slot_id}", delete(handlers::delete_slot))
        .route("/weekly-slots/{slot_id}/{day}", put(handlers::set_cell))
        .layer(middleware::from_fn_with_state(config, admin_session_middleware))
        .with_state(planner)
}
