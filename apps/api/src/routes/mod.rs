pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless engine API
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/batch", post(handlers::handle_batch))
        .route("/api/v1/duplicates", post(handlers::handle_duplicates))
        .route("/api/v1/rank", post(handlers::handle_rank))
        // Job pools
        .route("/api/v1/jobs/:job_id", put(handlers::handle_put_job))
        .route(
            "/api/v1/jobs/:job_id/candidates",
            post(handlers::handle_upsert_candidate),
        )
        .route(
            "/api/v1/jobs/:job_id/candidates/:candidate_id",
            delete(handlers::handle_remove_candidate),
        )
        .route(
            "/api/v1/jobs/:job_id/results",
            get(handlers::handle_job_results),
        )
        .route(
            "/api/v1/jobs/:job_id/summary",
            get(handlers::handle_job_summary),
        )
        .with_state(state)
}
