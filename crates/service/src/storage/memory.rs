use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use models::{Claim, ClaimFilter};
use tokio::sync::RwLock;
use tracing::debug;

use super::ClaimRepository;
use crate::errors::ServiceError;

/// Process-lifetime claim store keyed by `claim_id`.
///
/// Nothing is persisted; a restart starts empty. Concurrent updates to the
/// same claim are last-write-wins.
#[derive(Clone, Default)]
pub struct MemoryClaimRepository {
    inner: Arc<RwLock<HashMap<String, Claim>>>,
}

impl MemoryClaimRepository {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl ClaimRepository for MemoryClaimRepository {
    async fn create(&self, claim: Claim) -> Result<Claim, ServiceError> {
        let mut map = self.inner.write().await;
        map.insert(claim.claim_id.clone(), claim.clone());
        debug!(claim_id = %claim.claim_id, total = map.len(), "memory_claim_inserted");
        Ok(claim)
    }

    async fn get(&self, claim_id: &str) -> Result<Option<Claim>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(claim_id).cloned())
    }

    async fn list(&self, filter: &ClaimFilter) -> Result<Vec<Claim>, ServiceError> {
        let map = self.inner.read().await;
        let mut items: Vec<Claim> = map.values().filter(|c| filter.matches(c)).cloned().collect();
        drop(map);
        items.sort_by(Claim::newest_first);
        Ok(items)
    }

    async fn update_status(&self, claim_id: &str, new_status: &str) -> Result<Claim, ServiceError> {
        let mut map = self.inner.write().await;
        let mut claim = map.get(claim_id).cloned().ok_or_else(|| ServiceError::not_found("claim"))?;
        claim.status = new_status.to_uppercase();
        map.insert(claim_id.to_string(), claim.clone());
        Ok(claim)
    }

    fn backend_type(&self) -> &'static str { "memory" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::ClaimInput;
    use rust_decimal::Decimal;

    fn claim(id: &str, user: &str, secs: i64) -> Claim {
        let input = ClaimInput { user_id: user.into(), amount: Decimal::new(1000, 2), description: None };
        Claim::new(input, id.into(), Utc::now() + Duration::seconds(secs)).unwrap()
    }

    #[tokio::test]
    async fn create_get_and_list_newest_first() -> Result<(), anyhow::Error> {
        let repo = MemoryClaimRepository::new();
        assert!(repo.is_empty().await);

        repo.create(claim("a", "u1", 0)).await?;
        repo.create(claim("b", "u1", 10)).await?;
        repo.create(claim("c", "u2", 5)).await?;
        assert_eq!(repo.len().await, 3);

        let got = repo.get("b").await?.expect("b stored");
        assert_eq!(got.user_id, "u1");
        assert!(repo.get("missing").await?.is_none());

        let all = repo.list(&ClaimFilter::default()).await?;
        let ids: Vec<_> = all.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        let u1 = repo.list(&ClaimFilter::new(Some("u1".into()), None)).await?;
        assert_eq!(u1.len(), 2);
        assert!(u1.iter().all(|c| c.user_id == "u1"));

        let nobody = repo.list(&ClaimFilter::new(Some("nobody".into()), None)).await?;
        assert!(nobody.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_status_uppercases_and_keeps_other_fields() -> Result<(), anyhow::Error> {
        let repo = MemoryClaimRepository::new();
        let created = repo.create(claim("a", "u1", 0)).await?;

        let first = repo.update_status("a", "approved").await?;
        let second = repo.update_status("a", "approved").await?;
        assert_eq!(first.status, "APPROVED");
        assert_eq!(first, second);
        assert_eq!(second.created_at, created.created_at);
        assert_eq!(second.amount, created.amount);

        let approved_lower = repo.list(&ClaimFilter::new(None, Some("approved".into()))).await?;
        let approved_upper = repo.list(&ClaimFilter::new(None, Some("APPROVED".into()))).await?;
        assert_eq!(approved_lower, approved_upper);
        assert_eq!(approved_lower.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_is_not_found_and_changes_nothing() -> Result<(), anyhow::Error> {
        let repo = MemoryClaimRepository::new();
        let created = repo.create(claim("a", "u1", 0)).await?;

        let err = repo.update_status("nope", "APPROVED").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get("a").await?, Some(created));
        Ok(())
    }
}
