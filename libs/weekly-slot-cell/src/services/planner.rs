use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use sync_cell::{Notifier, SyncController, SyncError};

use crate::codec::SlotValue;
use crate::models::{is_valid_week_key, normalize_slot_time, WeeklyPlanState, WeeklySlot, Weekday};
use crate::services::repository::WeeklySlotRepository;

/// Weekly slot grid for one week (or the recurring template).
pub struct WeeklyPlanner {
    sync: SyncController<WeeklyPlanState>,
    repository: Arc<dyn WeeklySlotRepository>,
    loaded: AtomicBool,
}

impl WeeklyPlanner {
    pub fn new(repository: Arc<dyn WeeklySlotRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sync: SyncController::new(WeeklyPlanState::default(), notifier),
            repository,
            loaded: AtomicBool::new(false),
        }
    }

    pub async fn load(&self, week_key: Option<String>) -> Result<WeeklyPlanState, SyncError> {
        const ACTION: &str = "Muat jadwal mingguan";

        if let Some(key) = week_key.as_deref() {
            if !is_valid_week_key(key) {
                let error = SyncError::validation(format!("Kode minggu tidak valid: {}", key));
                return Err(self.sync.reject(ACTION, error).await);
            }
        }

        let slots = match self.repository.list_weekly_slots(week_key.as_deref()).await {
            Ok(slots) => slots,
            Err(e) => {
                let error = SyncError::Persistence {
                    action: ACTION.to_string(),
                    message: format!("{:#}", e),
                };
                return Err(self.sync.reject(ACTION, error).await);
            }
        };

        info!("Loaded {} weekly slots for {:?}", slots.len(), week_key);
        let state = WeeklyPlanState::new(week_key, slots);
        self.sync.store().replace(state.clone()).await;
        self.loaded.store(true, Ordering::SeqCst);
        Ok(state)
    }

    /// Returns the grid for `week_key`, loading it when another week is shown.
    pub async fn view(&self, week_key: Option<String>) -> Result<WeeklyPlanState, SyncError> {
        let current = self.sync.current().await;
        if self.loaded.load(Ordering::SeqCst) && current.week_key == week_key {
            return Ok(current);
        }
        self.load(week_key).await
    }

    pub async fn state(&self) -> WeeklyPlanState {
        self.sync.current().await
    }

    pub async fn add_slot(&self, week_key: Option<&str>, time: &str) -> Result<WeeklySlot, SyncError> {
        self.view(week_key.map(str::to_string)).await?;

        let repository = self.repository.as_ref();
        let key = week_key.map(str::to_string);
        self.sync
            .commit(
                "Tambah slot",
                |state| {
                    ensure_week(state, week_key)?;
                    let time = normalize_slot_time(time)?;
                    if state.slots.iter().any(|slot| slot.time == time) {
                        return Err(SyncError::validation(format!("Slot jam {} sudah ada", time)));
                    }

                    let slot = WeeklySlot::new(time);
                    state.insert(slot.clone());
                    Ok(slot)
                },
                |slot| async move {
                    repository.upsert_weekly_slot(&slot, key.as_deref()).await?;
                    Ok::<_, anyhow::Error>(slot)
                },
            )
            .await
    }

    /// Writes one day cell. An empty value clears the cell.
    pub async fn set_cell(
        &self,
        week_key: Option<&str>,
        slot_id: Uuid,
        day: Weekday,
        value: SlotValue,
    ) -> Result<WeeklySlot, SyncError> {
        self.view(week_key.map(str::to_string)).await?;

        let repository = self.repository.as_ref();
        let key = week_key.map(str::to_string);
        self.sync
            .commit(
                "Ubah slot",
                |state| {
                    ensure_week(state, week_key)?;
                    let value = value.validate()?;
                    let slot = state.slot_mut(slot_id)?;
                    *slot.cell_mut(day) = value;
                    Ok(slot.clone())
                },
                |slot| async move {
                    repository.upsert_weekly_slot(&slot, key.as_deref()).await?;
                    Ok::<_, anyhow::Error>(slot)
                },
            )
            .await
    }

    pub async fn delete_slot(&self, week_key: Option<&str>, slot_id: Uuid) -> Result<(), SyncError> {
        self.view(week_key.map(str::to_string)).await?;

        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Hapus slot",
                |state| {
                    ensure_week(state, week_key)?;
                    state.remove(slot_id)?;
                    Ok(slot_id)
                },
                |id| async move { repository.delete_weekly_slot(id).await },
            )
            .await
    }
}

/// The planner shows one week at a time; a write aimed at another week
/// fails instead of landing in whichever week is open now.
fn ensure_week(state: &WeeklyPlanState, week_key: Option<&str>) -> Result<(), SyncError> {
    if state.week_key.as_deref() == week_key {
        return Ok(());
    }
    Err(SyncError::validation(format!(
        "Jadwal minggu {} sedang berganti, silakan ulangi",
        week_key.unwrap_or("template")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_for_other_week_is_refused() {
        let state = WeeklyPlanState::new(Some("2024-W02".to_string()), Vec::new());

        assert!(ensure_week(&state, Some("2024-W02")).is_ok());
        assert!(matches!(ensure_week(&state, Some("2024-W01")), Err(SyncError::Validation(_))));
        assert!(matches!(ensure_week(&state, None), Err(SyncError::Validation(_))));
    }
}
