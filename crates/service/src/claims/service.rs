use std::sync::{Arc, Mutex};

use chrono::{DateTime, SubsecRound, Utc};
use models::{Claim, ClaimFilter, ClaimInput, StatusPatch};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::ClaimRepository;

/// Application service encapsulating claim business rules.
///
/// Input is validated here, before any repository call, and the server-side
/// identity (`claim_id`, `created_at`) is issued here so both backends store
/// exactly the same record.
pub struct ClaimService {
    repo: Arc<dyn ClaimRepository>,
    last_created_at: Mutex<DateTime<Utc>>,
}

impl ClaimService {
    pub fn new(repo: Arc<dyn ClaimRepository>) -> Self {
        Self { repo, last_created_at: Mutex::new(DateTime::<Utc>::MIN_UTC) }
    }

    pub fn backend_type(&self) -> &'static str { self.repo.backend_type() }

    /// Creation timestamps never go backwards within a process, even if the
    /// wall clock does. Microsecond precision matches what DynamoDB keys hold.
    fn next_created_at(&self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(6);
        let mut last = self.last_created_at.lock().unwrap_or_else(|p| p.into_inner());
        let issued = now.max(*last);
        *last = issued;
        issued
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create(&self, input: ClaimInput) -> Result<Claim, ServiceError> {
        let claim = Claim::new(input, Uuid::new_v4().to_string(), self.next_created_at())?;
        let stored = self.repo.create(claim).await?;
        info!(claim_id = %stored.claim_id, amount = %stored.amount, "claim_created");
        Ok(stored)
    }

    pub async fn get(&self, claim_id: &str) -> Result<Option<Claim>, ServiceError> {
        self.repo.get(claim_id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: ClaimFilter) -> Result<Vec<Claim>, ServiceError> {
        let filter = filter.normalized();
        let claims = self.repo.list(&filter).await?;
        info!(count = claims.len(), "claims_listed");
        Ok(claims)
    }

    /// Upper-case and store a new status. Applying the same status twice is a no-op.
    #[instrument(skip(self, patch))]
    pub async fn update_status(&self, claim_id: &str, patch: &StatusPatch) -> Result<Claim, ServiceError> {
        let status = patch.normalized()?;
        let updated = self.repo.update_status(claim_id, &status).await?;
        info!(status = %updated.status, "claim_status_updated");
        Ok(updated)
    }
}
