use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{AdminCredentialRow, ADMIN_CREDENTIALS_TABLE, ADMIN_CREDENTIAL_ID};
use crate::services::repository::AdminCredentialRepository;

pub struct SupabaseAdminCredentialRepository {
    supabase: SupabaseClient,
}

impl SupabaseAdminCredentialRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl AdminCredentialRepository for SupabaseAdminCredentialRepository {
    async fn load_hash(&self) -> Result<Option<String>> {
        debug!("Loading admin credential");

        let path = format!(
            "/rest/v1/{}?select=*&id=eq.{}",
            ADMIN_CREDENTIALS_TABLE, ADMIN_CREDENTIAL_ID
        );
        let rows: Vec<AdminCredentialRow> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.password_hash)
            .filter(|hash| !hash.is_empty()))
    }

    async fn store_hash(&self, password_hash: &str) -> Result<()> {
        debug!("Storing admin credential");
        let row = AdminCredentialRow {
            id: ADMIN_CREDENTIAL_ID,
            password_hash: password_hash.to_string(),
        };
        self.supabase
            .upsert(ADMIN_CREDENTIALS_TABLE, json!([serde_json::to_value(row)?]))
            .await
    }
}
