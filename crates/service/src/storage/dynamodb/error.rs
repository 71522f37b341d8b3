use aws_sdk_dynamodb::error::DisplayErrorContext;
use tracing::error;

use crate::errors::ServiceError;

/// Turn an SDK failure into a store error, keeping the full source chain in
/// the message.
pub(super) fn store_error<E>(operation: &'static str, err: E) -> ServiceError
where
    E: std::error::Error + 'static,
{
    let msg = DisplayErrorContext(err).to_string();
    error!(operation, error = %msg, "dynamodb request failed");
    ServiceError::Store(format!("dynamodb {operation} failed: {msg}"))
}

pub(super) fn malformed(attribute: &str, reason: &str) -> ServiceError {
    ServiceError::Store(format!("malformed claim item: {attribute} {reason}"))
}
