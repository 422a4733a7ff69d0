pub mod auth;
pub mod password;
pub mod repository;
pub mod supabase;

pub use auth::AuthService;
pub use password::PasswordService;
pub use repository::AdminCredentialRepository;
pub use supabase::SupabaseAdminCredentialRepository;
