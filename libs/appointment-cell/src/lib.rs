pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentBookState, AppointmentError, AppointmentInput, AppointmentQuery,
    CompletedRequest,
};
pub use router::appointment_routes;
pub use services::{AppointmentBook, AppointmentRepository, SupabaseAppointmentRepository};
