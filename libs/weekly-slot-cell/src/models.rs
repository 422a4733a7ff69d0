use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sync_cell::SyncError;

use crate::codec::{self, SlotCodecError, SlotValue};

pub const WEEKLY_SLOTS_TABLE: &str = "weekly_slots";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
    Minggu,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Senin,
        Weekday::Selasa,
        Weekday::Rabu,
        Weekday::Kamis,
        Weekday::Jumat,
        Weekday::Sabtu,
        Weekday::Minggu,
    ];

    /// Column name in the `weekly_slots` table.
    pub fn column(self) -> &'static str {
        match self {
            Weekday::Senin => "senin",
            Weekday::Selasa => "selasa",
            Weekday::Rabu => "rabu",
            Weekday::Kamis => "kamis",
            Weekday::Jumat => "jumat",
            Weekday::Sabtu => "sabtu",
            Weekday::Minggu => "minggu",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Weekday {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.column() == lowered)
            .ok_or_else(|| SyncError::validation(format!("Hari tidak dikenal: {}", s)))
    }
}

impl From<SlotCodecError> for SyncError {
    fn from(error: SlotCodecError) -> Self {
        SyncError::Validation(error.to_string())
    }
}

/// ISO week key such as `2024-W07`. Slots without a key form the recurring
/// template used for every week.
pub fn week_key_for(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

pub fn is_valid_week_key(key: &str) -> bool {
    match key.split_once("-W") {
        Some((year, week)) => {
            year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && week.len() == 2
                && week.parse::<u32>().map_or(false, |w| (1..=53).contains(&w))
        }
        None => false,
    }
}

/// Slot rows are keyed by `HH:MM`; seconds from the time column are dropped.
pub fn normalize_slot_time(raw: &str) -> Result<String, SyncError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| SyncError::validation(format!("Format jam tidak valid: {}", raw)))
}

// ==============================================================================
// SLOT ROWS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySlot {
    pub id: Uuid,
    /// `HH:MM`
    pub time: String,
    pub senin: SlotValue,
    pub selasa: SlotValue,
    pub rabu: SlotValue,
    pub kamis: SlotValue,
    pub jumat: SlotValue,
    pub sabtu: SlotValue,
    pub minggu: SlotValue,
}

impl WeeklySlot {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: time.into(),
            ..Self::default()
        }
    }

    pub fn cell(&self, day: Weekday) -> &SlotValue {
        match day {
            Weekday::Senin => &self.senin,
            Weekday::Selasa => &self.selasa,
            Weekday::Rabu => &self.rabu,
            Weekday::Kamis => &self.kamis,
            Weekday::Jumat => &self.jumat,
            Weekday::Sabtu => &self.sabtu,
            Weekday::Minggu => &self.minggu,
        }
    }

    pub fn cell_mut(&mut self, day: Weekday) -> &mut SlotValue {
        match day {
            Weekday::Senin => &mut self.senin,
            Weekday::Selasa => &mut self.selasa,
            Weekday::Rabu => &mut self.rabu,
            Weekday::Kamis => &mut self.kamis,
            Weekday::Jumat => &mut self.jumat,
            Weekday::Sabtu => &mut self.sabtu,
            Weekday::Minggu => &mut self.minggu,
        }
    }
}

/// Table shape; day columns are written only through the codec.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySlotRow {
    pub id: Uuid,
    pub time: String,
    #[serde(default)]
    pub week_key: Option<String>,
    #[serde(default)]
    pub senin: String,
    #[serde(default)]
    pub selasa: String,
    #[serde(default)]
    pub rabu: String,
    #[serde(default)]
    pub kamis: String,
    #[serde(default)]
    pub jumat: String,
    #[serde(default)]
    pub sabtu: String,
    #[serde(default)]
    pub minggu: String,
}

impl WeeklySlotRow {
    pub fn from_slot(slot: &WeeklySlot, week_key: Option<&str>) -> Self {
        Self {
            id: slot.id,
            time: slot.time.clone(),
            week_key: week_key.map(str::to_string),
            senin: codec::serialize(&slot.senin),
            selasa: codec::serialize(&slot.selasa),
            rabu: codec::serialize(&slot.rabu),
            kamis: codec::serialize(&slot.kamis),
            jumat: codec::serialize(&slot.jumat),
            sabtu: codec::serialize(&slot.sabtu),
            minggu: codec::serialize(&slot.minggu),
        }
    }

    pub fn into_slot(self) -> WeeklySlot {
        WeeklySlot {
            id: self.id,
            time: self.time,
            senin: codec::parse(&self.senin),
            selasa: codec::parse(&self.selasa),
            rabu: codec::parse(&self.rabu),
            kamis: codec::parse(&self.kamis),
            jumat: codec::parse(&self.jumat),
            sabtu: codec::parse(&self.sabtu),
            minggu: codec::parse(&self.minggu),
        }
    }
}

// ==============================================================================
// PLANNER STATE
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyPlanState {
    pub week_key: Option<String>,
    pub slots: Vec<WeeklySlot>,
}

impl WeeklyPlanState {
    pub fn new(week_key: Option<String>, mut slots: Vec<WeeklySlot>) -> Self {
        slots.sort_by(|a, b| a.time.cmp(&b.time));
        Self { week_key, slots }
    }

    pub fn slot_mut(&mut self, id: Uuid) -> Result<&mut WeeklySlot, SyncError> {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Slot {}", id)))
    }

    pub fn insert(&mut self, slot: WeeklySlot) {
        let position = self.slots.partition_point(|s| s.time <= slot.time);
        self.slots.insert(position, slot);
    }

    pub fn remove(&mut self, id: Uuid) -> Result<WeeklySlot, SyncError> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Slot {}", id)))?;
        Ok(self.slots.remove(index))
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekQuery {
    pub week: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub time: String,
}
