pub mod error;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod router;
pub mod rows;
pub mod services;

pub use error::DepartmentError;
pub use models::*;
pub use progress::{weighted_progress, CompletionWatcher, DepartmentProgress};
pub use router::department_routes;
pub use services::{DepartmentBoard, DepartmentRepository, PatientStatusChange, SupabaseDepartmentRepository};
