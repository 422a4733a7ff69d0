use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::session::clinic_today;

use appointment_cell::AppointmentBook;
use department_cell::DepartmentBoard;

use crate::workbook::{export_appointments, export_departments, Export, XLSX_CONTENT_TYPE};

#[derive(Clone)]
pub struct ExportState {
    pub departments: Arc<DepartmentBoard>,
    pub appointments: Arc<AppointmentBook>,
    pub config: Arc<AppConfig>,
}

fn attachment(export: Export) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn download_appointments(State(state): State<ExportState>) -> Result<Response, AppError> {
    let appointments = state.appointments.state().await.appointments;
    let today = clinic_today(state.config.utc_offset_hours);
    let export = export_appointments(&appointments, today)?;
    Ok(attachment(export))
}

#[axum::debug_handler]
pub async fn download_departments(State(state): State<ExportState>) -> Result<Response, AppError> {
    let departments = state.departments.state().await.departments;
    let today = clinic_today(state.config.utc_offset_hours);
    let export = export_departments(&departments, today)?;
    Ok(attachment(export))
}
