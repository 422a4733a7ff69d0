pub mod codec;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use codec::{Booking, SlotCodecError, SlotValue, BREAK_SENTINEL};
pub use models::{week_key_for, WeeklyPlanState, WeeklySlot, WeeklySlotRow, Weekday};
pub use router::weekly_slot_routes;
pub use services::{SupabaseWeeklySlotRepository, WeeklyPlanner, WeeklySlotRepository};
