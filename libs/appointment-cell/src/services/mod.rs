pub mod book;
pub mod repository;
pub mod supabase;

pub use book::AppointmentBook;
pub use repository::AppointmentRepository;
pub use supabase::SupabaseAppointmentRepository;
