use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use service::ClaimService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{metrics, openapi::ApiDoc};

pub mod claims;

/// Shared handler state. The claim service wraps the one repository chosen at startup.
#[derive(Clone)]
pub struct ServerState {
    pub claims: Arc<ClaimService>,
}

impl ServerState {
    pub fn new(claims: ClaimService) -> Self {
        Self { claims: Arc::new(claims) }
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is alive", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics_handler() -> (StatusCode, String) {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: health, claims, metrics and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    metrics::init();

    let claim_routes = Router::new()
        .route("/claims", get(claims::list).post(claims::create))
        .route("/claims/:claim_id", get(claims::get).patch(claims::update_status));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(claim_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
