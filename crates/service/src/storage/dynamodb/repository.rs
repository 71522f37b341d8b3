use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::{Credentials, Region},
    types::{AttributeValue, ReturnValue},
    Client,
};
use configs::DynamoDbConfig;
use models::{Claim, ClaimFilter};
use tracing::{debug, info, instrument};

use super::conversions::{claim_to_item, is_claim_item, item_to_claim};
use super::error::store_error;
use super::keys::{self, attr};
use super::pagination::collect_pages;
use crate::errors::ServiceError;
use crate::storage::ClaimRepository;

/// Claim store backed by a pre-provisioned DynamoDB table.
///
/// Updates are last-write-wins; there is no version check.
#[derive(Clone)]
pub struct DynamoDbClaimRepository {
    client: Client,
    table_name: String,
    scan_limit: i32,
}

impl DynamoDbClaimRepository {
    pub fn new(client: Client, table_name: impl Into<String>, scan_limit: i32) -> Self {
        Self { client, table_name: table_name.into(), scan_limit }
    }

    /// Build an SDK client from config. Static credentials and a custom
    /// endpoint (e.g. DynamoDB Local) are optional; otherwise the default
    /// AWS provider chain applies.
    pub async fn from_config(cfg: &DynamoDbConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()));
        if let (Some(key), Some(secret)) = (&cfg.access_key_id, &cfg.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(key, secret, None, None, "claims-config"));
        }
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        info!(
            table = %cfg.table_name,
            region = %cfg.region,
            endpoint = cfg.endpoint_url.as_deref().unwrap_or("aws-default"),
            "dynamodb_client_configured"
        );
        Self::new(Client::new(&sdk_config), cfg.table_name.clone(), cfg.scan_limit)
    }

    pub fn table_name(&self) -> &str { &self.table_name }

    pub fn client(&self) -> &Client { &self.client }

    fn primary_key(claim_id: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (attr::PK.to_string(), AttributeValue::S(keys::claim_pk(claim_id))),
            (attr::SK.to_string(), AttributeValue::S(keys::METADATA_SK.to_string())),
        ])
    }

    /// All claims of one user via `GSI1`, newest first. Follows pagination.
    async fn query_user(&self, user_id: &str) -> Result<Vec<Claim>, ServiceError> {
        let items = collect_pages(|start_key| {
            let request = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(keys::GSI1)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", attr::GSI1PK)
                .expression_attribute_values(":pk", AttributeValue::S(keys::user_gsi1pk(user_id)))
                .scan_index_forward(false)
                .set_exclusive_start_key(start_key);
            async move {
                let out = request.send().await.map_err(|e| store_error("query", e))?;
                Ok((out.items().to_vec(), out.last_evaluated_key().cloned()))
            }
        })
        .await?;
        items.iter().map(item_to_claim).collect()
    }

    /// One scan page capped at `scan_limit` items. Not exhaustive.
    async fn scan_bounded(&self) -> Result<Vec<Claim>, ServiceError> {
        let out = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(self.scan_limit)
            .send()
            .await
            .map_err(|e| store_error("scan", e))?;

        if out.last_evaluated_key().is_some_and(|k| !k.is_empty()) {
            debug!(limit = self.scan_limit, "claim_scan_truncated");
        }
        let mut claims = out
            .items()
            .iter()
            .filter(|item| is_claim_item(item))
            .map(item_to_claim)
            .collect::<Result<Vec<_>, _>>()?;
        claims.sort_by(Claim::newest_first);
        Ok(claims)
    }
}

#[async_trait]
impl ClaimRepository for DynamoDbClaimRepository {
    #[instrument(skip(self, claim), fields(claim_id = %claim.claim_id))]
    async fn create(&self, claim: Claim) -> Result<Claim, ServiceError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(claim_to_item(&claim)))
            .send()
            .await
            .map_err(|e| store_error("put_item", e))?;
        debug!("dynamodb_claim_put");
        Ok(claim)
    }

    #[instrument(skip(self))]
    async fn get(&self, claim_id: &str) -> Result<Option<Claim>, ServiceError> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::primary_key(claim_id)))
            .send()
            .await
            .map_err(|e| store_error("get_item", e))?;
        out.item().map(item_to_claim).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ClaimFilter) -> Result<Vec<Claim>, ServiceError> {
        let claims = match filter.user_id() {
            Some(user_id) => self.query_user(user_id).await?,
            None => self.scan_bounded().await?,
        };
        Ok(claims.into_iter().filter(|c| filter.matches_status(&c.status)).collect())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, claim_id: &str, new_status: &str) -> Result<Claim, ServiceError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::primary_key(claim_id)))
            .update_expression("SET #s = :s")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#s", attr::STATUS)
            .expression_attribute_names("#pk", attr::PK)
            .expression_attribute_values(":s", AttributeValue::S(new_status.to_uppercase()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(out) => {
                let attrs = out
                    .attributes()
                    .ok_or_else(|| ServiceError::Store("update_item returned no attributes".into()))?;
                item_to_claim(attrs)
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(ServiceError::not_found("claim"))
            }
            Err(err) => Err(store_error("update_item", err)),
        }
    }

    fn backend_type(&self) -> &'static str { "dynamodb" }
}
