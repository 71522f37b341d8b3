// Backend factory for creating the claim repository from configuration

use std::sync::Arc;

use anyhow::Result;
use configs::{StorageBackendKind, StorageConfig};
use tracing::info;

use super::{ClaimRepository, DynamoDbClaimRepository, MemoryClaimRepository};

pub struct StorageFactory;

impl StorageFactory {
    /// Create the process-wide claim repository. Called once at startup.
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn ClaimRepository>> {
        config.validate()?;
        let repo: Arc<dyn ClaimRepository> = match config.backend {
            StorageBackendKind::Memory => Arc::new(MemoryClaimRepository::new()),
            StorageBackendKind::Dynamodb => {
                Arc::new(DynamoDbClaimRepository::from_config(&config.dynamodb).await)
            }
        };
        info!(backend = repo.backend_type(), "claim_storage_selected");
        Ok(repo)
    }
}
