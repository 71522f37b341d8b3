//! Service layer for claims.
//! - `storage`: the backend-agnostic `ClaimRepository` contract and its
//!   in-memory and DynamoDB implementations.
//! - `claims`: `ClaimService`, which validates input, issues identity and
//!   delegates to whichever repository was selected at startup.

pub mod claims;
pub mod errors;
pub mod storage;

pub use claims::ClaimService;
pub use storage::{ClaimRepository, StorageFactory};
