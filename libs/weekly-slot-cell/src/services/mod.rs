pub mod planner;
pub mod repository;
pub mod supabase;

pub use planner::WeeklyPlanner;
pub use repository::WeeklySlotRepository;
pub use supabase::SupabaseWeeklySlotRepository;
