use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{AppointmentInput, AppointmentQuery, CompletedRequest};
use crate::services::AppointmentBook;

#[axum::debug_handler]
pub async fn list_appointments(
    State(book): State<Arc<AppointmentBook>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = book.list(&query).await;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(book): State<Arc<AppointmentBook>>,
    Json(request): Json<AppointmentInput>,
) -> Result<Json<Value>, AppError> {
    let appointment = book.add(request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(book): State<Arc<AppointmentBook>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<AppointmentInput>,
) -> Result<Json<Value>, AppError> {
    let appointment = book.update(appointment_id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn set_completed(
    State(book): State<Arc<AppointmentBook>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CompletedRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = book.set_completed(appointment_id, request.completed).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(book): State<Arc<AppointmentBook>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    book.delete(appointment_id).await?;
    Ok(Json(json!({ "deleted": appointment_id })))
}
