use anyhow::Result;
use async_trait::async_trait;

/// Storage for the single admin password hash.
#[async_trait]
pub trait AdminCredentialRepository: Send + Sync {
    async fn load_hash(&self) -> Result<Option<String>>;

    async fn store_hash(&self, password_hash: &str) -> Result<()>;
}
