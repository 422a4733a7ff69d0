use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ADMIN_SUBJECT: &str = "admin";

/// Claims carried by the daily admin session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    /// Clinic calendar day the session was opened on.
    pub day: NaiveDate,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    pub subject: String,
    pub day: NaiveDate,
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub valid: bool,
    pub day: Option<NaiveDate>,
}
