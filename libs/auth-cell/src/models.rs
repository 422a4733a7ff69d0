use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const ADMIN_CREDENTIALS_TABLE: &str = "admin_credentials";

/// The credential table holds exactly one row with this id.
pub const ADMIN_CREDENTIAL_ID: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentialRow {
    pub id: i32,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Clinic day the token is valid for.
    pub day: NaiveDate,
}
