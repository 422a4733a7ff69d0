use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sync_cell::{Notifier, SyncController, SyncError};

use crate::models::{Appointment, AppointmentBookState, AppointmentInput, AppointmentQuery};
use crate::services::repository::AppointmentRepository;

/// Appointment schedule view state.
pub struct AppointmentBook {
    sync: SyncController<AppointmentBookState>,
    repository: Arc<dyn AppointmentRepository>,
}

impl AppointmentBook {
    pub fn new(repository: Arc<dyn AppointmentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sync: SyncController::new(AppointmentBookState::default(), notifier),
            repository,
        }
    }

    pub async fn load(&self) -> Result<AppointmentBookState, SyncError> {
        let appointments = match self.repository.list_appointments().await {
            Ok(appointments) => appointments,
            Err(e) => {
                let error = SyncError::Persistence {
                    action: "Muat jadwal".to_string(),
                    message: format!("{:#}", e),
                };
                return Err(self.sync.reject("Muat jadwal", error).await);
            }
        };

        info!("Loaded {} appointments", appointments.len());
        let state = AppointmentBookState::new(appointments);
        self.sync.store().replace(state.clone()).await;
        Ok(state)
    }

    pub async fn state(&self) -> AppointmentBookState {
        self.sync.current().await
    }

    pub async fn list(&self, query: &AppointmentQuery) -> Vec<Appointment> {
        self.sync.store().read(|state| state.filter(query)).await
    }

    pub async fn add(&self, input: AppointmentInput) -> Result<Appointment, SyncError> {
        self.save("Tambah jadwal", |_| Ok(Appointment::from_input(Uuid::new_v4(), input)?))
            .await
    }

    pub async fn update(&self, appointment_id: Uuid, input: AppointmentInput) -> Result<Appointment, SyncError> {
        self.save("Ubah jadwal", |state| {
            state.get(appointment_id)?;
            Ok(Appointment::from_input(appointment_id, input)?)
        })
        .await
    }

    pub async fn set_completed(&self, appointment_id: Uuid, completed: bool) -> Result<Appointment, SyncError> {
        self.save("Ubah status jadwal", |state| {
            let mut appointment = state.get(appointment_id)?.clone();
            appointment.completed = completed;
            Ok(appointment)
        })
        .await
    }

    pub async fn delete(&self, appointment_id: Uuid) -> Result<(), SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Hapus jadwal",
                |state| {
                    state.remove(appointment_id)?;
                    Ok(appointment_id)
                },
                |id| async move { repository.delete_appointment(id).await },
            )
            .await
    }

    /// Builds the new version of one appointment, places it in the ordered
    /// list, and upserts that single row.
    async fn save<F>(&self, action: &str, build: F) -> Result<Appointment, SyncError>
    where
        F: FnOnce(&AppointmentBookState) -> Result<Appointment, SyncError>,
    {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                action,
                |state| {
                    let appointment = build(state)?;
                    state.put(appointment.clone());
                    Ok(appointment)
                },
                |appointment| async move {
                    repository.upsert_appointment(&appointment).await?;
                    Ok::<_, anyhow::Error>(appointment)
                },
            )
            .await
    }
}
