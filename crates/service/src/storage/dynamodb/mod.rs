//! DynamoDB claim store using a single-table design.
//!
//! | item            | PK                | SK         | GSI1PK           | GSI1SK                 |
//! |-----------------|-------------------|------------|------------------|------------------------|
//! | claim metadata  | `CLAIM#{claim_id}`| `METADATA` | `USER#{user_id}` | `CLAIM#{created_at}`   |
//!
//! `GSI1` serves "all claims of a user, newest first". Listings without a
//! user go through a bounded scan and are not exhaustive once the table
//! holds more than `scan_limit` items.
//!
//! The table and its index are provisioned outside this crate.

mod conversions;
mod error;
pub mod keys;
mod pagination;
mod repository;

pub use conversions::{claim_to_item, item_to_claim};
pub use repository::DynamoDbClaimRepository;
