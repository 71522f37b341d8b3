use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::{ClaimService, StorageFactory};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Select the storage backend once and wrap it in the claim service.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let repo = StorageFactory::create(&cfg.storage).await?;
    Ok(ServerState::new(ClaimService::new(repo)))
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app from validated config and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let backend = state.claims.backend_type();
    let app = build_app(state);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, backend, "starting claims server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
