//! Claim entity model shared by the storage backends and the HTTP layer.

pub mod claim;
pub mod errors;

pub use claim::{Claim, ClaimFilter, ClaimInput, StatusPatch, DEFAULT_STATUS};
