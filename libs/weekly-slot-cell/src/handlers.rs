use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::codec::SlotValue;
use crate::models::{CreateSlotRequest, WeekQuery, Weekday};
use crate::services::WeeklyPlanner;

#[axum::debug_handler]
pub async fn get_week(
    State(planner): State<Arc<WeeklyPlanner>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Value>, AppError> {
    let state = planner.view(query.week).await?;
    Ok(Json(json!(state)))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(planner): State<Arc<WeeklyPlanner>>,
    Query(query): Query<WeekQuery>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = planner.add_slot(query.week.as_deref(), &request.time).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn set_cell(
    State(planner): State<Arc<WeeklyPlanner>>,
    Path((slot_id, day)): Path<(Uuid, String)>,
    Query(query): Query<WeekQuery>,
    Json(value): Json<SlotValue>,
) -> Result<Json<Value>, AppError> {
    let day: Weekday = day.parse()?;
    let slot = planner.set_cell(query.week.as_deref(), slot_id, day, value).await?;
    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(planner): State<Arc<WeeklyPlanner>>,
    Path(slot_id): Path<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Value>, AppError> {
    planner.delete_slot(query.week.as_deref(), slot_id).await?;
    Ok(Json(json!({ "deleted": slot_id })))
}
