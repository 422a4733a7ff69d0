use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{normalize_time, Appointment, APPOINTMENTS_TABLE};
use crate::services::repository::AppointmentRepository;

pub struct SupabaseAppointmentRepository {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        debug!("Fetching appointments");

        let path = format!("/rest/v1/{}?select=*&order=date.asc,time.asc", APPOINTMENTS_TABLE);
        let mut appointments: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;

        // Postgres `time` columns come back with seconds.
        for appointment in &mut appointments {
            match normalize_time(&appointment.time) {
                Ok(time) => appointment.time = time,
                Err(e) => warn!("Appointment {} keeps raw time: {}", appointment.id, e),
            }
        }

        Ok(appointments)
    }

    async fn upsert_appointment(&self, appointment: &Appointment) -> Result<()> {
        debug!("Upserting appointment: {}", appointment.id);
        let row = serde_json::to_value(appointment)?;
        self.supabase.upsert(APPOINTMENTS_TABLE, json!([row])).await
    }

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<()> {
        debug!("Deleting appointment: {}", appointment_id);
        let path = format!("/rest/v1/{}?id=eq.{}", APPOINTMENTS_TABLE, appointment_id);
        self.supabase.execute(Method::DELETE, &path, None, None).await
    }
}
