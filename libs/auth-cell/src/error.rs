use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Kata sandi salah")]
    InvalidPassword,

    #[error("Kata sandi baru terlalu lemah: {0}")]
    WeakPassword(String),

    #[error("Kata sandi admin belum diatur")]
    NotConfigured,

    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AuthError::Hash(error.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidPassword => AppError::Auth(error.to_string()),
            AuthError::WeakPassword(_) => AppError::ValidationError(error.to_string()),
            AuthError::NotConfigured | AuthError::Hash(_) | AuthError::Session(_) => {
                AppError::Internal(error.to_string())
            }
            AuthError::Storage(e) => AppError::Persistence(format!("{:#}", e)),
        }
    }
}
