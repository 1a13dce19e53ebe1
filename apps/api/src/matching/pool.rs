//! In-memory candidate pool for one job with its cached MatchResults.
//!
//! Every mutation recomputes the affected results wholesale and re-runs
//! duplicate clustering over the whole pool. Inputs are validated before
//! anything is touched, so a rejected mutation leaves the pool unchanged.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::matching::engine::{apply_duplicates, evaluate};
use crate::matching::ranking::{summarize, JobSummary};
use crate::matching::settings::EngineSettings;
use crate::models::candidate::CandidateRecord;
use crate::models::job::{Job, RequirementSet};
use crate::models::match_result::{DuplicateCluster, MatchResult};

#[derive(Debug, Clone)]
pub struct JobPool {
    job: Job,
    requirements: RequirementSet,
    candidates: Vec<CandidateRecord>,
    results: Vec<MatchResult>,
    clusters: Vec<DuplicateCluster>,
}

impl JobPool {
    /// An empty pool for `job`. Returns the weight warning, if any.
    pub fn new(job: Job, settings: &EngineSettings) -> Result<(Self, Option<String>), AppError> {
        settings.validate()?;
        let requirements = job.validate()?;
        let warning = requirements.weight_warning();
        if let Some(w) = &warning {
            warn!(job_id = %job.id, "{w}");
        }
        Ok((
            Self {
                job,
                requirements,
                candidates: Vec::new(),
                results: Vec::new(),
                clusters: Vec::new(),
            },
            warning,
        ))
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn candidates(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    /// Cached results in candidate insertion order.
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn clusters(&self) -> &[DuplicateCluster] {
        &self.clusters
    }

    pub fn summary(&self) -> JobSummary {
        summarize(&self.results)
    }

    /// Replaces the job definition and rescores every candidate.
    pub fn replace_requirements(
        &mut self,
        job: Job,
        settings: &EngineSettings,
    ) -> Result<Option<String>, AppError> {
        settings.validate()?;
        if job.id != self.job.id {
            return Err(AppError::invalid(format!(
                "cannot replace job '{}' with job '{}'",
                self.job.id, job.id
            )));
        }
        let requirements = job.validate()?;
        let mut results = self
            .candidates
            .iter()
            .map(|c| evaluate(&job, &requirements, c, settings))
            .collect::<Result<Vec<_>, _>>()?;
        let clusters = apply_duplicates(&mut results, &self.candidates, settings)?;

        let warning = requirements.weight_warning();
        if let Some(w) = &warning {
            warn!(job_id = %job.id, "{w}");
        }
        self.job = job;
        self.requirements = requirements;
        self.results = results;
        self.clusters = clusters;
        info!(
            job_id = %self.job.id,
            candidates = self.candidates.len(),
            requirements = self.requirements.len(),
            "requirements replaced; pool rescored"
        );
        Ok(warning)
    }

    /// Inserts or replaces a candidate by id and returns its fresh result.
    pub fn upsert_candidate(
        &mut self,
        candidate: CandidateRecord,
        settings: &EngineSettings,
    ) -> Result<&MatchResult, AppError> {
        settings.validate()?;
        let result = evaluate(&self.job, &self.requirements, &candidate, settings)?;

        let mut candidates = self.candidates.clone();
        let mut results = self.results.clone();
        let index = match candidates.iter().position(|c| c.id == candidate.id) {
            Some(i) => {
                candidates[i] = candidate;
                results[i] = result;
                i
            }
            None => {
                candidates.push(candidate);
                results.push(result);
                candidates.len() - 1
            }
        };
        let clusters = apply_duplicates(&mut results, &candidates, settings)?;

        self.candidates = candidates;
        self.results = results;
        self.clusters = clusters;
        info!(
            job_id = %self.job.id,
            candidate_id = %self.results[index].candidate_id,
            pool = self.candidates.len(),
            "candidate upserted"
        );
        Ok(&self.results[index])
    }

    pub fn remove_candidate(
        &mut self,
        candidate_id: &str,
        settings: &EngineSettings,
    ) -> Result<CandidateRecord, AppError> {
        settings.validate()?;
        let index = self
            .candidates
            .iter()
            .position(|c| c.id == candidate_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "candidate {candidate_id} not found in job {}",
                    self.job.id
                ))
            })?;

        let removed = self.candidates.remove(index);
        self.results.remove(index);
        self.clusters = apply_duplicates(&mut self.results, &self.candidates, settings)?;
        info!(
            job_id = %self.job.id,
            candidate_id,
            pool = self.candidates.len(),
            "candidate removed"
        );
        Ok(removed)
    }
}
