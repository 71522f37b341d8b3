use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use models::{Claim, ClaimFilter, ClaimInput, StatusPatch};
use serde::Deserialize;
use tracing::info;

use crate::{errors::JsonApiError, metrics, routes::ServerState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only claims of this user (served by the per-user index).
    pub user_id: Option<String>,
    /// Case-insensitive status match.
    pub status: Option<String>,
}

impl From<ListQuery> for ClaimFilter {
    fn from(q: ListQuery) -> Self {
        ClaimFilter::new(q.user_id, q.status)
    }
}

#[utoipa::path(
    post, path = "/claims", tag = "claims",
    request_body = crate::openapi::CreateClaimDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ClaimDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Store Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<ClaimInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Claim>), JsonApiError> {
    let Json(input) = body?;
    let claim = state.claims.create(input).await?;
    metrics::CLAIMS_CREATED_TOTAL.inc();
    info!(claim_id = %claim.claim_id, user_id = %claim.user_id, "claim_create_request");
    Ok((StatusCode::CREATED, Json(claim)))
}

#[utoipa::path(
    get, path = "/claims", tag = "claims",
    params(ListQuery),
    responses(
        (status = 200, description = "Claims, newest first", body = [crate::openapi::ClaimDoc]),
        (status = 500, description = "Store Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Claim>>, JsonApiError> {
    let Query(q) = query?;
    let claims = state.claims.list(q.into()).await?;
    metrics::CLAIM_LIST_REQUESTS_TOTAL.inc();
    Ok(Json(claims))
}

#[utoipa::path(
    get, path = "/claims/{claim_id}", tag = "claims",
    params(("claim_id" = String, Path, description = "Claim id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ClaimDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(claim_id): Path<String>,
) -> Result<Json<Claim>, JsonApiError> {
    match state.claims.get(&claim_id).await? {
        Some(claim) => Ok(Json(claim)),
        None => Err(service::errors::ServiceError::not_found("claim").into()),
    }
}

#[utoipa::path(
    patch, path = "/claims/{claim_id}", tag = "claims",
    params(("claim_id" = String, Path, description = "Claim id")),
    request_body = crate::openapi::StatusPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ClaimDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(claim_id): Path<String>,
    body: Result<Json<StatusPatch>, JsonRejection>,
) -> Result<Json<Claim>, JsonApiError> {
    let Json(patch) = body?;
    let claim = state.claims.update_status(&claim_id, &patch).await?;
    metrics::CLAIM_STATUS_UPDATES_TOTAL.inc();
    info!(claim_id = %claim.claim_id, status = %claim.status, "claim_status_update_request");
    Ok(Json(claim))
}
