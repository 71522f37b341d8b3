//! Runs against DynamoDB Local. Set `DYNAMODB_ENDPOINT` (e.g.
//! `http://localhost:8001`) to enable; otherwise every test returns early.

use std::str::FromStr;
use std::sync::Arc;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use configs::DynamoDbConfig;
use models::{ClaimFilter, ClaimInput, StatusPatch};
use rust_decimal::Decimal;
use service::errors::ServiceError;
use service::storage::{dynamodb::keys, DynamoDbClaimRepository};
use service::{ClaimRepository, ClaimService};
use uuid::Uuid;

struct TestTable {
    repo: Arc<DynamoDbClaimRepository>,
}

impl TestTable {
    async fn drop_table(&self) {
        let _ = self
            .repo
            .client()
            .delete_table()
            .table_name(self.repo.table_name())
            .send()
            .await;
    }
}

fn attr_def(name: &str) -> anyhow::Result<AttributeDefinition> {
    Ok(AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()?)
}

fn key(name: &str, key_type: KeyType) -> anyhow::Result<KeySchemaElement> {
    Ok(KeySchemaElement::builder().attribute_name(name).key_type(key_type).build()?)
}

/// Fixture: a throwaway table with the production key schema and `GSI1`.
async fn setup(scan_limit: i32) -> anyhow::Result<Option<TestTable>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(endpoint) = std::env::var("DYNAMODB_ENDPOINT") else {
        eprintln!("DYNAMODB_ENDPOINT missing; skip dynamodb integration tests");
        return Ok(None);
    };

    let cfg = DynamoDbConfig {
        table_name: format!("claims_it_{}", Uuid::new_v4().simple()),
        endpoint_url: Some(endpoint),
        access_key_id: Some("fakeMyKeyId".into()),
        secret_access_key: Some("fakeSecretAccessKey".into()),
        scan_limit,
        ..DynamoDbConfig::default()
    };
    let repo = DynamoDbClaimRepository::from_config(&cfg).await;

    let gsi = GlobalSecondaryIndex::builder()
        .index_name(keys::GSI1)
        .key_schema(key(keys::attr::GSI1PK, KeyType::Hash)?)
        .key_schema(key(keys::attr::GSI1SK, KeyType::Range)?)
        .projection(Projection::builder().projection_type(ProjectionType::All).build())
        .build()?;

    repo.client()
        .create_table()
        .table_name(&cfg.table_name)
        .attribute_definitions(attr_def(keys::attr::PK)?)
        .attribute_definitions(attr_def(keys::attr::SK)?)
        .attribute_definitions(attr_def(keys::attr::GSI1PK)?)
        .attribute_definitions(attr_def(keys::attr::GSI1SK)?)
        .key_schema(key(keys::attr::PK, KeyType::Hash)?)
        .key_schema(key(keys::attr::SK, KeyType::Range)?)
        .global_secondary_indexes(gsi)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await?;

    Ok(Some(TestTable { repo: Arc::new(repo) }))
}

fn input(user: &str, amount: &str) -> ClaimInput {
    ClaimInput {
        user_id: user.into(),
        amount: Decimal::from_str(amount).expect("decimal literal"),
        description: None,
    }
}

#[tokio::test]
async fn dynamodb_create_update_list_scenario() -> anyhow::Result<()> {
    let Some(table) = setup(100).await? else { return Ok(()) };
    let svc = ClaimService::new(table.repo.clone());

    let created = svc.create(input("u1", "100.50")).await?;
    assert_eq!(created.status, "PENDING");

    let fetched = table.repo.get(&created.claim_id).await?.expect("stored");
    assert_eq!(fetched, created);
    assert_eq!(fetched.amount.to_string(), "100.5");
    assert_eq!(created.amount.to_string(), "100.5");

    let updated = svc
        .update_status(&created.claim_id, &StatusPatch { status: "approved".into() })
        .await?;
    assert_eq!(updated.status, "APPROVED");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.amount, created.amount);

    let listed = svc.list(ClaimFilter::new(Some("u1".into()), None)).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, "APPROVED");

    table.drop_table().await;
    Ok(())
}

#[tokio::test]
async fn dynamodb_user_query_is_newest_first_and_status_filter_case_insensitive() -> anyhow::Result<()> {
    let Some(table) = setup(100).await? else { return Ok(()) };
    let svc = ClaimService::new(table.repo.clone());

    let first = svc.create(input("u2", "1")).await?;
    let second = svc.create(input("u2", "2")).await?;
    let third = svc.create(input("u2", "3")).await?;
    svc.create(input("someone-else", "4")).await?;
    svc.update_status(&second.claim_id, &StatusPatch { status: "Approved".into() }).await?;

    let mine = svc.list(ClaimFilter::new(Some("u2".into()), None)).await?;
    let ids: Vec<_> = mine.iter().map(|c| c.claim_id.clone()).collect();
    assert_eq!(ids, vec![third.claim_id.clone(), second.claim_id.clone(), first.claim_id.clone()]);

    let lower = svc.list(ClaimFilter::new(Some("u2".into()), Some("approved".into()))).await?;
    let upper = svc.list(ClaimFilter::new(Some("u2".into()), Some("APPROVED".into()))).await?;
    assert_eq!(lower, upper);
    assert_eq!(lower.len(), 1);

    let empty = svc.list(ClaimFilter::new(Some("no-such-user".into()), None)).await?;
    assert!(empty.is_empty());

    table.drop_table().await;
    Ok(())
}

#[tokio::test]
async fn dynamodb_scan_status_filter_is_case_insensitive() -> anyhow::Result<()> {
    let Some(table) = setup(100).await? else { return Ok(()) };
    let svc = ClaimService::new(table.repo.clone());

    let approved_a = svc.create(input("s1", "10")).await?;
    svc.create(input("s2", "20")).await?;
    let approved_b = svc.create(input("s3", "30")).await?;
    svc.update_status(&approved_a.claim_id, &StatusPatch { status: "approved".into() }).await?;
    svc.update_status(&approved_b.claim_id, &StatusPatch { status: "Approved".into() }).await?;

    let lower = svc.list(ClaimFilter::new(None, Some("approved".into()))).await?;
    let upper = svc.list(ClaimFilter::new(None, Some("APPROVED".into()))).await?;
    assert_eq!(lower, upper);
    let ids: Vec<_> = lower.iter().map(|c| c.claim_id.clone()).collect();
    assert_eq!(ids, vec![approved_b.claim_id.clone(), approved_a.claim_id.clone()]);
    assert!(lower.iter().all(|c| c.status == "APPROVED"));

    let pending = svc.list(ClaimFilter::new(None, Some("pending".into()))).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user_id, "s2");

    table.drop_table().await;
    Ok(())
}

#[tokio::test]
async fn dynamodb_update_unknown_is_not_found() -> anyhow::Result<()> {
    let Some(table) = setup(100).await? else { return Ok(()) };
    let existing = ClaimService::new(table.repo.clone()).create(input("u3", "9.99")).await?;

    let err = table.repo.update_status("missing-claim", "APPROVED").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    // the failed conditional update must not have created an item
    assert!(table.repo.get("missing-claim").await?.is_none());
    assert_eq!(table.repo.get(&existing.claim_id).await?, Some(existing));

    table.drop_table().await;
    Ok(())
}

#[tokio::test]
async fn dynamodb_unfiltered_listing_is_capped() -> anyhow::Result<()> {
    let Some(table) = setup(3).await? else { return Ok(()) };
    let svc = ClaimService::new(table.repo.clone());
    for i in 0..5 {
        svc.create(input(&format!("user-{i}"), "1")).await?;
    }

    let listed = svc.list(ClaimFilter::default()).await?;
    assert!(listed.len() <= 3);
    assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    table.drop_table().await;
    Ok(())
}
