use std::{collections::HashMap, str::FromStr};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDateTime, Utc};
use models::Claim;
use rust_decimal::Decimal;

use super::error::malformed;
use super::keys::{self, attr};
use crate::errors::ServiceError;

pub type Item = HashMap<String, AttributeValue>;

/// Full item for `PutItem`: primary key, `GSI1` keys and claim attributes.
/// An absent description is stored as an empty string.
pub fn claim_to_item(claim: &Claim) -> Item {
    let created_iso = keys::created_at_iso(&claim.created_at);
    HashMap::from([
        (attr::PK.to_string(), AttributeValue::S(keys::claim_pk(&claim.claim_id))),
        (attr::SK.to_string(), AttributeValue::S(keys::METADATA_SK.to_string())),
        (attr::USER_ID.to_string(), AttributeValue::S(claim.user_id.clone())),
        (attr::AMOUNT.to_string(), AttributeValue::N(claim.amount.to_string())),
        (
            attr::DESCRIPTION.to_string(),
            AttributeValue::S(claim.description.clone().unwrap_or_default()),
        ),
        (attr::STATUS.to_string(), AttributeValue::S(claim.status.clone())),
        (attr::CREATED_AT.to_string(), AttributeValue::S(created_iso)),
        (attr::GSI1PK.to_string(), AttributeValue::S(keys::user_gsi1pk(&claim.user_id))),
        (attr::GSI1SK.to_string(), AttributeValue::S(keys::claim_gsi1sk(&claim.created_at))),
    ])
}

pub fn item_to_claim(item: &Item) -> Result<Claim, ServiceError> {
    let pk = string_attr(item, attr::PK)?;
    let claim_id = keys::claim_id_from_pk(pk).ok_or_else(|| malformed(attr::PK, "is not a claim key"))?;

    let amount_raw = item
        .get(attr::AMOUNT)
        .ok_or_else(|| malformed(attr::AMOUNT, "is missing"))?
        .as_n()
        .map_err(|_| malformed(attr::AMOUNT, "is not a number"))?;
    let amount = Decimal::from_str(amount_raw).map_err(|_| malformed(attr::AMOUNT, "is not a decimal"))?;

    let created_raw = string_attr(item, attr::CREATED_AT)?;
    let created_at = parse_created_at(created_raw)
        .ok_or_else(|| malformed(attr::CREATED_AT, "is not an ISO-8601 timestamp"))?;

    let description = match item.get(attr::DESCRIPTION) {
        Some(AttributeValue::S(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    Ok(Claim {
        claim_id: claim_id.to_string(),
        user_id: string_attr(item, attr::USER_ID)?.to_string(),
        amount,
        description,
        status: string_attr(item, attr::STATUS)?.to_string(),
        created_at,
    })
}

/// RFC 3339, or a timestamp without offset (read as UTC) as older
/// writers stored it.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

/// True for claim metadata items; other item types may share the table.
pub(super) fn is_claim_item(item: &Item) -> bool {
    let sk_ok = matches!(item.get(attr::SK), Some(AttributeValue::S(sk)) if sk == keys::METADATA_SK);
    let pk_ok = matches!(item.get(attr::PK), Some(AttributeValue::S(pk)) if keys::claim_id_from_pk(pk).is_some());
    sk_ok && pk_ok
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Result<&'a str, ServiceError> {
    item.get(name)
        .ok_or_else(|| malformed(name, "is missing"))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| malformed(name, "is not a string"))
}
