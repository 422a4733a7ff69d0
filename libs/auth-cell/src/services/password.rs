use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::instrument;

use crate::error::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

const COMMON_PASSWORDS: [&str; 8] = [
    "password", "12345678", "admin123", "qwerty12", "klinik123", "password1", "11111111", "abc12345",
];

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Minimal policy for the shared admin password.
    pub fn validate_new_password(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "minimal {} karakter",
                MIN_PASSWORD_LENGTH
            )));
        }

        let mut chars = password.chars();
        if let Some(first) = chars.next() {
            if chars.all(|c| c == first) {
                return Err(AuthError::WeakPassword("karakter berulang".to_string()));
            }
        }

        let lowered = password.to_lowercase();
        if COMMON_PASSWORDS.iter().any(|common| lowered == *common) {
            return Err(AuthError::WeakPassword("terlalu umum".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("senyum-sehat-2024").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify_password("senyum-sehat-2024", &hash).unwrap());
        assert!(!PasswordService::verify_password("salah", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert_matches!(
            PasswordService::verify_password("x", "not-a-hash"),
            Err(AuthError::Hash(_))
        );
    }

    #[test]
    fn test_password_policy() {
        assert_matches!(PasswordService::validate_new_password("short"), Err(AuthError::WeakPassword(_)));
        assert_matches!(PasswordService::validate_new_password("aaaaaaaaa"), Err(AuthError::WeakPassword(_)));
        assert_matches!(PasswordService::validate_new_password("Password"), Err(AuthError::WeakPassword(_)));
        assert!(PasswordService::validate_new_password("gigi-sehat-99").is_ok());
    }
}
