use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_utils::session::{clinic_today, issue_session_token};

use crate::error::AuthError;
use crate::models::LoginResponse;
use crate::services::password::PasswordService;
use crate::services::repository::AdminCredentialRepository;

/// Admin password checks and daily session issuing.
pub struct AuthService {
    repository: Arc<dyn AdminCredentialRepository>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn AdminCredentialRepository>, config: Arc<AppConfig>) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// Until a hash is stored, the configured bootstrap password is accepted
    /// once and its hash written.
    pub async fn verify_admin_password(&self, plaintext: &str) -> Result<bool, AuthError> {
        if let Some(hash) = self.repository.load_hash().await? {
            return PasswordService::verify_password(plaintext, &hash);
        }

        let bootstrap = self
            .config
            .admin_bootstrap_password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or(AuthError::NotConfigured)?;

        if plaintext != bootstrap {
            return Ok(false);
        }

        info!("No admin credential stored, seeding from bootstrap password");
        let hash = PasswordService::hash_password(plaintext)?;
        if let Err(e) = self.repository.store_hash(&hash).await {
            warn!("Failed to store bootstrap credential: {:#}", e);
        }
        Ok(true)
    }

    pub async fn set_admin_password(&self, plaintext: &str) -> Result<(), AuthError> {
        PasswordService::validate_new_password(plaintext)?;
        let hash = PasswordService::hash_password(plaintext)?;
        self.repository.store_hash(&hash).await?;
        info!("Admin password changed");
        Ok(())
    }

    pub async fn login(&self, password: &str) -> Result<LoginResponse, AuthError> {
        if !self.verify_admin_password(password).await? {
            debug!("Rejected admin login");
            return Err(AuthError::InvalidPassword);
        }
        self.open_session()
    }

    /// Rotates the password and returns a fresh session for today.
    pub async fn change_password(&self, current: &str, new_password: &str) -> Result<LoginResponse, AuthError> {
        if !self.verify_admin_password(current).await? {
            return Err(AuthError::InvalidPassword);
        }
        self.set_admin_password(new_password).await?;
        self.open_session()
    }

    fn open_session(&self) -> Result<LoginResponse, AuthError> {
        let day = clinic_today(self.config.utc_offset_hours);
        let token = issue_session_token(day, &self.config.session_secret).map_err(AuthError::Session)?;
        Ok(LoginResponse { token, day })
    }
}
