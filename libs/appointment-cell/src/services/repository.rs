use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Appointment;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn list_appointments(&self) -> Result<Vec<Appointment>>;

    async fn upsert_appointment(&self, appointment: &Appointment) -> Result<()>;

    async fn delete_appointment(&self, appointment_id: Uuid) -> Result<()>;
}
