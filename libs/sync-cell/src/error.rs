use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("{action} failed: {message}")]
    Persistence { action: String, message: String },
}

impl SyncError {
    pub fn validation(message: impl Into<String>) -> Self {
        SyncError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        SyncError::NotFound(what.into())
    }

    /// True when the error was raised before any persistence call was issued.
    pub fn is_local(&self) -> bool {
        !matches!(self, SyncError::Persistence { .. })
    }
}

impl From<SyncError> for AppError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::Validation(msg) => AppError::ValidationError(msg),
            SyncError::NotFound(msg) => AppError::NotFound(msg),
            SyncError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            SyncError::Persistence { action, message } => {
                AppError::Persistence(format!("{}: {}", action, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_errors() {
        assert!(SyncError::validation("x").is_local());
        assert!(!SyncError::Persistence { action: "a".into(), message: "m".into() }.is_local());
    }

    #[test]
    fn test_app_error_mapping() {
        let error: AppError = SyncError::not_found("Pasien").into();
        assert!(matches!(error, AppError::NotFound(_)));

        let error: AppError = SyncError::Persistence {
            action: "Hapus pasien".into(),
            message: "timeout".into(),
        }
        .into();
        assert!(matches!(error, AppError::Persistence(msg) if msg == "Hapus pasien: timeout"));
    }
}
