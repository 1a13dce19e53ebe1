//! Orchestration of the matching pipeline:
//! normalizer → skill matcher → scorer + confidence → MatchResult, with the
//! duplicate detector annotating batch output.
//!
//! All entry points take `&EngineSettings` explicitly and are pure over their
//! inputs, so per-candidate work runs in parallel under rayon.

use std::borrow::Cow;
use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::matching::anonymize::anonymize;
use crate::matching::confidence::confidence;
use crate::matching::dedup::{check_ids, duplicate_statuses, find_duplicates};
use crate::matching::scoring::score;
use crate::matching::settings::EngineSettings;
use crate::matching::skills::match_skills;
use crate::models::candidate::CandidateRecord;
use crate::models::job::{Job, RequirementSet};
use crate::models::match_result::{DuplicateCluster, DuplicateStatus, MatchResult};

/// Output of `detect_duplicates`: a status for every candidate plus the
/// clusters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub statuses: BTreeMap<String, DuplicateStatus>,
    pub clusters: Vec<DuplicateCluster>,
}

/// Scores one candidate against a job.
pub fn compute_match(
    job: &Job,
    candidate: &CandidateRecord,
    settings: &EngineSettings,
) -> Result<MatchResult, AppError> {
    settings.validate()?;
    let requirements = job.validate()?;
    evaluate(job, &requirements, candidate, settings)
}

/// Scores every candidate, output in input order, then annotates duplicates
/// across the whole batch when detection is enabled.
pub fn compute_batch(
    job: &Job,
    candidates: &[CandidateRecord],
    settings: &EngineSettings,
) -> Result<Vec<MatchResult>, AppError> {
    settings.validate()?;
    let requirements = job.validate()?;
    check_ids(candidates)?;
    if let Some(warning) = requirements.weight_warning() {
        warn!(job_id = %job.id, "{warning}");
    }

    let mut results = candidates
        .par_iter()
        .map(|c| evaluate(job, &requirements, c, settings))
        .collect::<Result<Vec<_>, _>>()?;

    let clusters = apply_duplicates(&mut results, candidates, settings)?;
    info!(
        job_id = %job.id,
        candidates = results.len(),
        clusters = clusters.len(),
        "batch scored"
    );
    Ok(results)
}

pub fn detect_duplicates(
    candidates: &[CandidateRecord],
    settings: &EngineSettings,
) -> Result<DuplicateReport, AppError> {
    settings.validate()?;
    let clusters = find_duplicates(candidates, &settings.duplicates)?;
    Ok(DuplicateReport {
        statuses: duplicate_statuses(candidates, &clusters),
        clusters,
    })
}

/// Scores one candidate against an already validated requirement set.
pub(crate) fn evaluate(
    job: &Job,
    requirements: &RequirementSet,
    candidate: &CandidateRecord,
    settings: &EngineSettings,
) -> Result<MatchResult, AppError> {
    candidate.validate()?;
    if candidate.job_id != job.id {
        return Err(AppError::invalid(format!(
            "candidate {} belongs to job '{}', not '{}'",
            candidate.id, candidate.job_id, job.id
        )));
    }

    let view = if settings.bias_reduction_enabled {
        Cow::Owned(anonymize(candidate))
    } else {
        Cow::Borrowed(candidate)
    };
    if view.skills.is_empty() {
        debug!(candidate_id = %candidate.id, "candidate has no extracted skills");
    }

    let matched = match_skills(
        requirements,
        &view.skills,
        settings.fuzzy_skill_threshold,
        job.min_experience,
        &settings.experience,
    );
    let breakdown = score(&matched, requirements, job.min_experience, &settings.experience);
    let ai_confidence = confidence(&matched, requirements, &view.skills, &settings.confidence);

    debug!(
        candidate_id = %candidate.id,
        job_id = %job.id,
        score = breakdown.score,
        confidence = ai_confidence,
        fuzzy = matched.fuzzy_count(),
        "candidate scored"
    );

    let skill_gaps = matched.gaps();
    let matched_skills = matched.matched().cloned().collect();

    // Display fields come from the source record, never the scored view.
    Ok(MatchResult {
        candidate_id: candidate.id.clone(),
        job_id: job.id.clone(),
        match_score: breakdown.score,
        ai_confidence,
        matched_skills,
        skill_gaps,
        other_skills: matched.other_skills,
        breakdown: breakdown.contributions,
        is_duplicate: false,
        duplicate_of: None,
        auto_shortlist: breakdown.score >= settings.auto_shortlist_threshold,
        needs_review: ai_confidence < settings.confidence_threshold,
        candidate_name: candidate.name.clone(),
        candidate_email: candidate.email.clone(),
        status: candidate.status,
        applied_at: candidate.applied_at,
    })
}

/// Re-runs clustering over the full pool and rewrites every result's
/// duplicate flags. Duplicates are never auto-shortlisted.
pub(crate) fn apply_duplicates(
    results: &mut [MatchResult],
    candidates: &[CandidateRecord],
    settings: &EngineSettings,
) -> Result<Vec<DuplicateCluster>, AppError> {
    let clusters = if settings.duplicate_detection_enabled {
        find_duplicates(candidates, &settings.duplicates)?
    } else {
        Vec::new()
    };
    let statuses = duplicate_statuses(candidates, &clusters);

    for result in results.iter_mut() {
        let status = statuses.get(&result.candidate_id).cloned().unwrap_or_default();
        result.is_duplicate = status.is_duplicate;
        result.duplicate_of = status.duplicate_of;
        result.auto_shortlist =
            !result.is_duplicate && result.match_score >= settings.auto_shortlist_threshold;
    }
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fixtures::{candidate, frontend_job, frontend_pool};
    use crate::models::candidate::CandidateSkill;
    use crate::models::job::SkillRequirement;

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    fn with_skills(id: &str, skills: &[(&str, Option<f64>)]) -> CandidateRecord {
        let mut record = candidate(id, "Test Person", "Remote");
        record.skills = skills
            .iter()
            .map(|(n, y)| CandidateSkill::new(*n, *y))
            .collect();
        record
    }

    #[test]
    fn test_fully_qualified_candidate() {
        let result = compute_match(&frontend_job(), &frontend_pool()[4], &settings()).unwrap();
        assert_eq!(result.match_score, 100);
        assert!(result.skill_gaps.is_empty());
        assert_eq!(result.matched_skills.len(), 5);
        assert_eq!(result.ai_confidence, 100);
        assert!(result.auto_shortlist);
        assert!(!result.needs_review);
    }

    #[test]
    fn test_single_junior_skill() {
        let record = with_skills("c", &[("React", Some(3.0))]);
        let result = compute_match(&frontend_job(), &record, &settings()).unwrap();
        assert!((15..=18).contains(&result.match_score));
        assert_eq!(
            result.skill_gaps,
            vec!["TypeScript", "Next.js", "Tailwind", "GraphQL"]
        );
        assert!(!result.auto_shortlist);
    }

    #[test]
    fn test_empty_skill_candidate_scores_zero() {
        let record = candidate("empty", "No Skills", "Remote");
        let result = compute_match(&frontend_job(), &record, &settings()).unwrap();
        assert_eq!(result.match_score, 0);
        assert_eq!(result.skill_gaps.len(), 5);
        assert!(result.matched_skills.is_empty());
        assert!(result.needs_review);
    }

    #[test]
    fn test_job_mismatch_rejected() {
        let mut record = with_skills("c", &[("React", Some(3.0))]);
        record.job_id = "job-2".to_string();
        let err = compute_match(&frontend_job(), &record, &settings()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad = EngineSettings {
            fuzzy_skill_threshold: 1.5,
            ..settings()
        };
        let record = with_skills("c", &[]);
        assert!(compute_match(&frontend_job(), &record, &bad).is_err());
    }

    #[test]
    fn test_empty_requirement_set_scores_zero_for_everyone() {
        let job = Job {
            requirements: Vec::new(),
            ..frontend_job()
        };
        for result in compute_batch(&job, &frontend_pool(), &settings()).unwrap() {
            assert_eq!(result.match_score, 0);
            assert!(result.skill_gaps.is_empty());
        }
    }

    #[test]
    fn test_bias_reduction_does_not_change_scores_and_restores_display() {
        let record = frontend_pool().remove(1);
        let on = compute_match(&frontend_job(), &record, &settings()).unwrap();
        let off = compute_match(
            &frontend_job(),
            &record,
            &EngineSettings {
                bias_reduction_enabled: false,
                ..settings()
            },
        )
        .unwrap();
        assert_eq!(on.match_score, off.match_score);
        assert_eq!(on.ai_confidence, off.ai_confidence);
        assert_eq!(on.candidate_name, "Michael Rodriguez");
        assert_eq!(on.candidate_email, "m.rodriguez@email.com");
    }

    #[test]
    fn test_weight_scaling_invariance_end_to_end() {
        let base = frontend_job();
        let scaled = Job {
            requirements: base
                .requirements
                .iter()
                .map(|r| SkillRequirement::new(r.name.clone(), r.weight * 3))
                .collect(),
            ..frontend_job()
        };
        for record in frontend_pool() {
            let a = compute_match(&base, &record, &settings()).unwrap();
            let b = compute_match(&scaled, &record, &settings()).unwrap();
            assert_eq!(a.match_score, b.match_score, "{}", record.id);
        }
    }

    #[test]
    fn test_batch_preserves_order_and_flags_duplicates() {
        let pool = frontend_pool();
        let results = compute_batch(&frontend_job(), &pool, &settings()).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["cand-1", "cand-2", "cand-3", "cand-4", "cand-5"]);

        let canonical = &results[0];
        let duplicate = &results[4];
        assert!(!canonical.is_duplicate);
        assert!(canonical.auto_shortlist);
        assert!(duplicate.is_duplicate);
        assert_eq!(duplicate.duplicate_of.as_deref(), Some("cand-1"));
        assert_eq!(duplicate.match_score, 100);
        assert!(!duplicate.auto_shortlist);
        assert!(results[1..4].iter().all(|r| !r.is_duplicate));
    }

    #[test]
    fn test_batch_without_duplicate_detection() {
        let disabled = EngineSettings {
            duplicate_detection_enabled: false,
            ..settings()
        };
        let results = compute_batch(&frontend_job(), &frontend_pool(), &disabled).unwrap();
        assert!(results.iter().all(|r| !r.is_duplicate && r.duplicate_of.is_none()));
        assert!(results[4].auto_shortlist);
    }

    #[test]
    fn test_batch_rejects_duplicate_ids() {
        let mut pool = frontend_pool();
        pool[1].id = "cand-1".to_string();
        assert!(compute_batch(&frontend_job(), &pool, &settings()).is_err());
    }

    #[test]
    fn test_scores_bounded_across_pool() {
        for result in compute_batch(&frontend_job(), &frontend_pool(), &settings()).unwrap() {
            assert!(result.match_score <= 100);
            assert!(result.ai_confidence <= 100);
        }
    }

    #[test]
    fn test_detect_duplicates_mapping() {
        let report = detect_duplicates(&frontend_pool(), &settings()).unwrap();
        assert_eq!(report.statuses.len(), 5);
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(
            report.statuses["cand-5"].duplicate_of.as_deref(),
            Some("cand-1")
        );
        assert!(!report.statuses["cand-1"].is_duplicate);
        // idempotent
        assert_eq!(detect_duplicates(&frontend_pool(), &settings()).unwrap(), report);
    }
}
