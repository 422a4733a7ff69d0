pub mod board;
pub mod photo;
pub mod repository;
pub mod supabase;

pub use board::{DepartmentBoard, PatientStatusChange};
pub use photo::{decode_image_payload, extension_for};
pub use repository::DepartmentRepository;
pub use supabase::SupabaseDepartmentRepository;
