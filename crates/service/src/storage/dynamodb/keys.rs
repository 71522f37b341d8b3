use chrono::{DateTime, SecondsFormat, Utc};

pub const GSI1: &str = "GSI1";
pub const METADATA_SK: &str = "METADATA";

const CLAIM_PREFIX: &str = "CLAIM#";
const USER_PREFIX: &str = "USER#";

/// Attribute names of a stored claim item.
pub mod attr {
    pub const PK: &str = "PK";
    pub const SK: &str = "SK";
    pub const GSI1PK: &str = "GSI1PK";
    pub const GSI1SK: &str = "GSI1SK";
    pub const USER_ID: &str = "user_id";
    pub const AMOUNT: &str = "amount";
    pub const DESCRIPTION: &str = "description";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
}

pub fn claim_pk(claim_id: &str) -> String {
    format!("{CLAIM_PREFIX}{claim_id}")
}

/// Inverse of [`claim_pk`].
pub fn claim_id_from_pk(pk: &str) -> Option<&str> {
    pk.strip_prefix(CLAIM_PREFIX).filter(|id| !id.is_empty())
}

pub fn user_gsi1pk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Fixed-width ISO-8601 (microseconds, `Z`), so lexical order is chronological.
pub fn created_at_iso(created_at: &DateTime<Utc>) -> String {
    created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn claim_gsi1sk(created_at: &DateTime<Utc>) -> String {
    format!("{CLAIM_PREFIX}{}", created_at_iso(created_at))
}
