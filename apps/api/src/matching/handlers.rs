use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::matching::engine::{compute_batch, compute_match, detect_duplicates, DuplicateReport};
use crate::matching::pool::JobPool;
use crate::matching::ranking::{rank, JobSummary, RankFilters};
use crate::matching::settings::EngineSettings;
use crate::models::candidate::CandidateRecord;
use crate::models::job::{Job, SkillRequirement};
use crate::models::match_result::MatchResult;
use crate::state::{AppState, SharedPool};

#[derive(Deserialize)]
pub struct MatchRequest {
    pub job: Job,
    pub candidate: CandidateRecord,
    /// Overrides the server defaults for this call only.
    #[serde(default)]
    pub settings: Option<EngineSettings>,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub job: Job,
    pub candidates: Vec<CandidateRecord>,
    #[serde(default)]
    pub settings: Option<EngineSettings>,
}

#[derive(Deserialize)]
pub struct DuplicatesRequest {
    pub candidates: Vec<CandidateRecord>,
    #[serde(default)]
    pub settings: Option<EngineSettings>,
}

#[derive(Deserialize)]
pub struct RankRequest {
    pub results: Vec<MatchResult>,
    #[serde(default)]
    pub filters: RankFilters,
}

/// Body of `PUT /api/v1/jobs/:job_id`; the id comes from the path.
#[derive(Deserialize)]
pub struct JobDefinition {
    #[serde(default)]
    pub title: Option<String>,
    pub requirements: Vec<SkillRequirement>,
    #[serde(default)]
    pub min_experience: f64,
}

#[derive(Serialize)]
pub struct JobPoolResponse {
    pub job: Job,
    pub candidates: usize,
    pub weight_warning: Option<String>,
}

fn effective_settings(state: &AppState, requested: Option<EngineSettings>) -> EngineSettings {
    requested.unwrap_or_else(|| state.config.settings.clone())
}

/// Runs CPU-bound engine work on the blocking pool so it never stalls the async executor.
async fn run_blocking<T, F>(what: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {what}: {e}")))?
}

async fn existing_pool(state: &AppState, job_id: &str) -> Result<SharedPool, AppError> {
    state
        .pool(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let settings = effective_settings(&state, req.settings);
    let result = run_blocking("match scoring", move || {
        compute_match(&req.job, &req.candidate, &settings)
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/v1/match/batch
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let settings = effective_settings(&state, req.settings);
    let results = run_blocking("batch scoring", move || {
        compute_batch(&req.job, &req.candidates, &settings)
    })
    .await?;
    Ok(Json(results))
}

/// POST /api/v1/duplicates
pub async fn handle_duplicates(
    State(state): State<AppState>,
    Json(req): Json<DuplicatesRequest>,
) -> Result<Json<DuplicateReport>, AppError> {
    let settings = effective_settings(&state, req.settings);
    let report = run_blocking("duplicate detection", move || {
        detect_duplicates(&req.candidates, &settings)
    })
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/rank
pub async fn handle_rank(Json(req): Json<RankRequest>) -> Json<Vec<MatchResult>> {
    Json(rank(&req.results, &req.filters).to_vec())
}

/// PUT /api/v1/jobs/:job_id
///
/// A new job gets an empty pool, which only needs validation. Replacing an
/// existing job's requirements rescores the whole pool on the blocking pool
/// while holding that job's lock only.
pub async fn handle_put_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(def): Json<JobDefinition>,
) -> Result<Json<JobPoolResponse>, AppError> {
    let job = Job {
        id: job_id.clone(),
        title: def.title,
        requirements: def.requirements,
        min_experience: def.min_experience,
    };
    let settings = state.config.settings.clone();

    let existing = {
        let mut pools = state.pools.write().await;
        match pools.get(&job_id) {
            Some(pool) => Arc::clone(pool),
            None => {
                let (pool, weight_warning) = JobPool::new(job, &settings)?;
                let response = JobPoolResponse {
                    job: pool.job().clone(),
                    candidates: 0,
                    weight_warning,
                };
                pools.insert(job_id, Arc::new(RwLock::new(pool)));
                return Ok(Json(response));
            }
        }
    };

    let mut pool = existing.write_owned().await;
    let response = run_blocking("job update", move || {
        let weight_warning = pool.replace_requirements(job, &settings)?;
        Ok(JobPoolResponse {
            job: pool.job().clone(),
            candidates: pool.candidates().len(),
            weight_warning,
        })
    })
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/jobs/:job_id/candidates
pub async fn handle_upsert_candidate(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(candidate): Json<CandidateRecord>,
) -> Result<Json<MatchResult>, AppError> {
    let settings = state.config.settings.clone();
    let mut pool = existing_pool(&state, &job_id).await?.write_owned().await;
    let result = run_blocking("candidate upsert", move || {
        pool.upsert_candidate(candidate, &settings).cloned()
    })
    .await?;
    Ok(Json(result))
}

/// DELETE /api/v1/jobs/:job_id/candidates/:candidate_id
pub async fn handle_remove_candidate(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let settings = state.config.settings.clone();
    let mut pool = existing_pool(&state, &job_id).await?.write_owned().await;
    run_blocking("candidate removal", move || {
        pool.remove_candidate(&candidate_id, &settings)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:job_id/results
pub async fn handle_job_results(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(filters): Query<RankFilters>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let pool = existing_pool(&state, &job_id).await?;
    let pool = pool.read().await;
    Ok(Json(rank(pool.results(), &filters).to_vec()))
}

/// GET /api/v1/jobs/:job_id/summary
pub async fn handle_job_summary(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobSummary>, AppError> {
    let pool = existing_pool(&state, &job_id).await?;
    let summary = pool.read().await.summary();
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn test_blocking_work_returns_its_result() {
        let value = run_blocking("sum", || Ok::<_, AppError>((1..=4).sum::<u32>()))
            .await
            .unwrap();
        assert_eq!(value, 10);

        let err = run_blocking("lookup", || {
            Err::<(), _>(AppError::NotFound("missing".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_panicking_blocking_work_is_internal_error() {
        let err = run_blocking("scoring", || -> Result<(), AppError> { panic!("boom") })
            .await
            .unwrap_err();
        match err {
            AppError::Internal(e) => assert!(e.to_string().contains("scoring")),
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
