use axum::routing::{delete, post, put};
use axum::{Router, routing::get};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route("/api/jobs", post(handlers::jobs::create))
        .route("/api/jobs", get(handlers::jobs::list))
        .route("/api/jobs/export", get(handlers::jobs::export))
        .route("/api/jobs/:id", get(handlers::jobs::get_one))
        .route("/api/jobs/:id", put(handlers::jobs::update))
        .route("/api/jobs/:id", delete(handlers::jobs::remove))
        .route("/api/upload", post(handlers::uploads::upload))
        .route("/uploads/:filename", get(handlers::uploads::retrieve))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
