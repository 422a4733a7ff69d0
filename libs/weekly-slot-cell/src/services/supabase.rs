use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{normalize_slot_time, WeeklySlot, WeeklySlotRow, WEEKLY_SLOTS_TABLE};
use crate::services::repository::WeeklySlotRepository;

pub struct SupabaseWeeklySlotRepository {
    supabase: SupabaseClient,
}

impl SupabaseWeeklySlotRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

fn week_filter(week_key: Option<&str>) -> String {
    match week_key {
        Some(key) => format!("week_key=eq.{}", urlencoding::encode(key)),
        None => "week_key=is.null".to_string(),
    }
}

#[async_trait]
impl WeeklySlotRepository for SupabaseWeeklySlotRepository {
    async fn list_weekly_slots(&self, week_key: Option<&str>) -> Result<Vec<WeeklySlot>> {
        debug!("Fetching weekly slots for {:?}", week_key);

        let path = format!(
            "/rest/v1/{}?select=*&{}&order=time.asc",
            WEEKLY_SLOTS_TABLE,
            week_filter(week_key)
        );
        let rows: Vec<WeeklySlotRow> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut slot = row.into_slot();
                match normalize_slot_time(&slot.time) {
                    Ok(time) => slot.time = time,
                    Err(e) => warn!("Slot {} keeps raw time: {}", slot.id, e),
                }
                slot
            })
            .collect())
    }

    async fn upsert_weekly_slot(&self, slot: &WeeklySlot, week_key: Option<&str>) -> Result<()> {
        debug!("Upserting weekly slot: {}", slot.id);
        let row = serde_json::to_value(WeeklySlotRow::from_slot(slot, week_key))?;
        self.supabase.upsert(WEEKLY_SLOTS_TABLE, json!([row])).await
    }

    async fn delete_weekly_slot(&self, slot_id: Uuid) -> Result<()> {
        debug!("Deleting weekly slot: {}", slot_id);
        let path = format!("/rest/v1/{}?id=eq.{}", WEEKLY_SLOTS_TABLE, slot_id);
        self.supabase.execute(Method::DELETE, &path, None, None).await
    }
}
