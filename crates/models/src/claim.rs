use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Status every claim starts in.
pub const DEFAULT_STATUS: &str = "PENDING";

/// A stored claim record.
///
/// `claim_id`, `created_at` and the initial `status` are assigned by the
/// server; everything else comes from [`ClaimInput`] and never changes after
/// creation except `status`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub user_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new claim.
///
/// `amount` is read from the JSON number's literal text (or a string), never
/// through `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    pub user_id: String,
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a status update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub status: String,
}

/// Optional listing filters. Blank values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimFilter {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub fn validate_user_id(user_id: &str) -> Result<(), ModelError> {
    if user_id.trim().is_empty() {
        return Err(ModelError::Validation("user_id must not be empty".into()));
    }
    Ok(())
}

pub fn validate_amount(amount: &Decimal) -> Result<(), ModelError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ModelError::Validation("amount must be >= 0".into()));
    }
    Ok(())
}

/// Canonical stored form of a status: upper-cased, never blank.
pub fn normalize_status(status: &str) -> Result<String, ModelError> {
    if status.trim().is_empty() {
        return Err(ModelError::Validation("status must not be empty".into()));
    }
    Ok(status.to_uppercase())
}

impl ClaimInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_user_id(&self.user_id)?;
        validate_amount(&self.amount)?;
        Ok(())
    }
}

impl StatusPatch {
    pub fn normalized(&self) -> Result<String, ModelError> {
        normalize_status(&self.status)
    }
}

impl Claim {
    /// Build a fresh `PENDING` claim from validated input and server-issued identity.
    ///
    /// The amount is stored without trailing zeros (`100.50` becomes `100.5`),
    /// the form DynamoDB keeps for `N` attributes.
    pub fn new(
        input: ClaimInput,
        claim_id: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ModelError> {
        input.validate()?;
        let description = input.description.filter(|d| !d.trim().is_empty());
        Ok(Self {
            claim_id,
            user_id: input.user_id,
            amount: input.amount.normalize(),
            description,
            status: DEFAULT_STATUS.to_string(),
            created_at,
        })
    }

    /// Newest first; equal timestamps fall back to `claim_id` so the order is stable.
    pub fn newest_first(a: &Claim, b: &Claim) -> std::cmp::Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.claim_id.cmp(&a.claim_id))
    }
}

impl ClaimFilter {
    pub fn new(user_id: Option<String>, status: Option<String>) -> Self {
        Self { user_id, status }.normalized()
    }

    /// Drop blank filter values.
    pub fn normalized(self) -> Self {
        Self {
            user_id: self.user_id.filter(|u| !u.is_empty()),
            status: self.status.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|u| !u.is_empty())
    }

    /// Upper-cased status filter, if any.
    pub fn status(&self) -> Option<String> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_uppercase)
    }

    pub fn matches_status(&self, stored_status: &str) -> bool {
        match self.status() {
            Some(wanted) => stored_status.to_uppercase() == wanted,
            None => true,
        }
    }

    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(user_id) = self.user_id() {
            if claim.user_id != user_id {
                return false;
            }
        }
        self.matches_status(&claim.status)
    }
}
