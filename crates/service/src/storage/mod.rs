//! Storage abstractions for claims.
//!
//! One [`ClaimRepository`] implementation is chosen at process start by
//! [`StorageFactory`] and shared as `Arc<dyn ClaimRepository>` for the rest of
//! the process lifetime.

pub mod dynamodb;
pub mod factory;
pub mod memory;

use async_trait::async_trait;
use models::{Claim, ClaimFilter};

use crate::errors::ServiceError;

pub use dynamodb::DynamoDbClaimRepository;
pub use factory::StorageFactory;
pub use memory::MemoryClaimRepository;

/// Backend-agnostic data access for claims.
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Persist a new claim. Identity and timestamps are already assigned.
    async fn create(&self, claim: Claim) -> Result<Claim, ServiceError>;

    async fn get(&self, claim_id: &str) -> Result<Option<Claim>, ServiceError>;

    /// Claims matching every supplied filter, newest `created_at` first.
    /// The status filter is case-insensitive on every backend.
    async fn list(&self, filter: &ClaimFilter) -> Result<Vec<Claim>, ServiceError>;

    /// Set the (upper-cased) status and return the updated record, or
    /// `ServiceError::NotFound` when the id is unknown.
    async fn update_status(&self, claim_id: &str, new_status: &str) -> Result<Claim, ServiceError>;

    /// Backend identifier, e.g. for startup logs.
    fn backend_type(&self) -> &'static str;
}
