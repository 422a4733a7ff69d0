use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use sync_cell::SyncError;

pub const APPOINTMENTS_TABLE: &str = "appointments";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// One scheduled visit. The department is free text, not a reference to a
/// department row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub date: NaiveDate,
    /// `HH:MM`, normalized on every write.
    pub time: String,
    #[serde(default)]
    pub cubicle: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub case_text: String,
    #[serde(default)]
    pub department_name: String,
    pub patient_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub completed: bool,
}

impl Appointment {
    pub fn from_input(id: Uuid, input: AppointmentInput) -> Result<Self, AppointmentError> {
        let patient_name = input.patient_name.trim();
        if patient_name.is_empty() {
            return Err(AppointmentError::MissingPatientName);
        }

        Ok(Self {
            id,
            date: input.date,
            time: normalize_time(&input.time)?,
            cubicle: input.cubicle.trim().to_string(),
            treatment_plan: input.treatment_plan.trim().to_string(),
            case_text: input.case_text.trim().to_string(),
            department_name: input.department_name.trim().to_string(),
            patient_name: patient_name.to_string(),
            phone: input.phone.trim().to_string(),
            completed: input.completed,
        })
    }

    fn sort_key(&self) -> (NaiveDate, &str, &str) {
        (self.date, self.time.as_str(), self.cubicle.as_str())
    }
}

/// Accepts `HH:MM` or `HH:MM:SS` and returns `HH:MM`.
pub fn normalize_time(raw: &str) -> Result<String, AppointmentError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| AppointmentError::InvalidTime(raw.to_string()))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppointmentError {
    #[error("Nama pasien wajib diisi")]
    MissingPatientName,

    #[error("Format jam tidak valid: {0}")]
    InvalidTime(String),
}

impl From<AppointmentError> for SyncError {
    fn from(error: AppointmentError) -> Self {
        SyncError::Validation(error.to_string())
    }
}

// ==============================================================================
// BOOK STATE
// ==============================================================================

/// Appointments ordered by date, time and cubicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentBookState {
    pub appointments: Vec<Appointment>,
}

impl AppointmentBookState {
    pub fn new(mut appointments: Vec<Appointment>) -> Self {
        appointments.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { appointments }
    }

    pub fn get(&self, id: Uuid) -> Result<&Appointment, SyncError> {
        self.appointments
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Jadwal {}", id)))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut Appointment, SyncError> {
        self.appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Jadwal {}", id)))
    }

    /// Inserts or replaces by id and keeps the ordering.
    pub fn put(&mut self, appointment: Appointment) {
        self.appointments.retain(|a| a.id != appointment.id);
        let position = self
            .appointments
            .partition_point(|a| a.sort_key() <= appointment.sort_key());
        self.appointments.insert(position, appointment);
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Appointment, SyncError> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Jadwal {}", id)))?;
        Ok(self.appointments.remove(index))
    }

    pub fn filter(&self, query: &AppointmentQuery) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| query.date.map_or(true, |date| a.date == date))
            .filter(|a| query.completed.map_or(true, |completed| a.completed == completed))
            .cloned()
            .collect()
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentInput {
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub cubicle: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub case_text: String,
    #[serde(default)]
    pub department_name: String,
    pub patient_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
}
