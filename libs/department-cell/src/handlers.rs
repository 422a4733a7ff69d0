use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    CreateDepartmentRequest, CreatePatientRequest, PatientEntryInput, PhotoUploadRequest,
    RenameRequest, ReorderRequest, SetSubDepartmentsRequest, UpdatePatientRequest,
    UpdateStatusRequest,
};
use crate::services::DepartmentBoard;

// ==============================================================================
// DEPARTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_board(
    State(board): State<Arc<DepartmentBoard>>,
) -> Result<Json<Value>, AppError> {
    let state = board.state().await;
    Ok(Json(json!({
        "departments": state.departments,
        "total": state.departments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_progress(
    State(board): State<Arc<DepartmentBoard>>,
) -> Result<Json<Value>, AppError> {
    let progress = board.progress().await;
    Ok(Json(json!({ "progress": progress })))
}

#[axum::debug_handler]
pub async fn create_department(
    State(board): State<Arc<DepartmentBoard>>,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<Json<Value>, AppError> {
    let department = board.add_department(request).await?;
    Ok(Json(json!(department)))
}

#[axum::debug_handler]
pub async fn rename_department(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<Value>, AppError> {
    let department = board.rename_department(department_id, &request.name).await?;
    Ok(Json(json!(department)))
}

#[axum::debug_handler]
pub async fn set_sub_department_mode(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
    Json(request): Json<SetSubDepartmentsRequest>,
) -> Result<Json<Value>, AppError> {
    let department = board
        .set_has_sub_departments(department_id, request.has_sub_departments)
        .await?;
    Ok(Json(json!(department)))
}

#[axum::debug_handler]
pub async fn delete_department(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    board.delete_department(department_id).await?;
    Ok(Json(json!({ "deleted": department_id })))
}

#[axum::debug_handler]
pub async fn reorder_departments(
    State(board): State<Arc<DepartmentBoard>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Value>, AppError> {
    let departments = board.reorder_departments(request.from, request.to).await?;
    Ok(Json(json!({ "departments": departments })))
}

// ==============================================================================
// SUB-DEPARTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_sub_department(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<Value>, AppError> {
    let sub = board.add_sub_department(department_id, &request.name).await?;
    Ok(Json(json!(sub)))
}

#[axum::debug_handler]
pub async fn rename_sub_department(
    State(board): State<Arc<DepartmentBoard>>,
    Path(sub_department_id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<Value>, AppError> {
    let sub = board.rename_sub_department(sub_department_id, &request.name).await?;
    Ok(Json(json!(sub)))
}

#[axum::debug_handler]
pub async fn delete_sub_department(
    State(board): State<Arc<DepartmentBoard>>,
    Path(sub_department_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    board.delete_sub_department(sub_department_id).await?;
    Ok(Json(json!({ "deleted": sub_department_id })))
}

// ==============================================================================
// PATIENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_patient(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = board.add_patient(department_id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn reorder_patients(
    State(board): State<Arc<DepartmentBoard>>,
    Path(department_id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Value>, AppError> {
    let patients = board
        .reorder_patients(department_id, request.sub_department_id, request.from, request.to)
        .await?;
    Ok(Json(json!({ "patients": patients })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(board): State<Arc<DepartmentBoard>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = board.update_patient(patient_id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient_status(
    State(board): State<Arc<DepartmentBoard>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let change = board.set_patient_status(patient_id, request.status).await?;
    Ok(Json(json!(change)))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(board): State<Arc<DepartmentBoard>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    board.delete_patient(patient_id).await?;
    Ok(Json(json!({ "deleted": patient_id })))
}

#[axum::debug_handler]
pub async fn add_entry(
    State(board): State<Arc<DepartmentBoard>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<PatientEntryInput>,
) -> Result<Json<Value>, AppError> {
    let patient = board.add_entry(patient_id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_entry(
    State(board): State<Arc<DepartmentBoard>>,
    Path((patient_id, entry_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<PatientEntryInput>,
) -> Result<Json<Value>, AppError> {
    let patient = board.update_entry(patient_id, entry_id, request).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn remove_entry(
    State(board): State<Arc<DepartmentBoard>>,
    Path((patient_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let patient = board.remove_entry(patient_id, entry_id).await?;
    Ok(Json(json!(patient)))
}

// ==============================================================================
// PHOTOS
// ==============================================================================

#[axum::debug_handler]
pub async fn upload_photo(
    State(board): State<Arc<DepartmentBoard>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<PhotoUploadRequest>,
) -> Result<Json<Value>, AppError> {
    let photo = board.attach_photo_payload(patient_id, request).await?;
    Ok(Json(json!(photo)))
}

#[axum::debug_handler]
pub async fn delete_photo(
    State(board): State<Arc<DepartmentBoard>>,
    Path(photo_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    board.delete_photo(photo_id).await?;
    Ok(Json(json!({ "deleted": photo_id })))
}
