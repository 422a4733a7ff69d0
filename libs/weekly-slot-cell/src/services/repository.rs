use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::WeeklySlot;

/// `week_key == None` addresses the recurring template.
#[async_trait]
pub trait WeeklySlotRepository: Send + Sync {
    async fn list_weekly_slots(&self, week_key: Option<&str>) -> Result<Vec<WeeklySlot>>;

    async fn upsert_weekly_slot(&self, slot: &WeeklySlot, week_key: Option<&str>) -> Result<()>;

    async fn delete_weekly_slot(&self, slot_id: Uuid) -> Result<()>;
}
