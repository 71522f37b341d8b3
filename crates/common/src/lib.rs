//! Shared building blocks for the claims tracker crates.
//! - `types`: small wire types reused by the HTTP layer.
//! - `utils::logging`: tracing subscriber setup shared by binaries and tests.

pub mod types;
pub mod utils;
