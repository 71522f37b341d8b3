//! Claim business rules on top of the selected `ClaimRepository`.

pub mod service;

pub use service::ClaimService;
