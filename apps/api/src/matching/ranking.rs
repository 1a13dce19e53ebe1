//! Ranking aggregator: filtered, deterministically ordered views over a
//! job's cached MatchResults. `rank` filters and sorts eagerly; the view it
//! returns borrows the cache and never mutates it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateStatus;
use crate::models::match_result::MatchResult;

/// Predicates ANDed together. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankFilters {
    pub status: Option<CandidateStatus>,
    pub min_score: Option<u8>,
    pub job_id: Option<String>,
    pub hide_duplicates: bool,
    /// Case-insensitive substring over candidate name and e-mail.
    pub search: Option<String>,
}

impl RankFilters {
    pub fn accepts(&self, result: &MatchResult) -> bool {
        if self.status.is_some_and(|s| s != result.status) {
            return false;
        }
        if self.min_score.is_some_and(|min| result.match_score < min) {
            return false;
        }
        if self
            .job_id
            .as_deref()
            .is_some_and(|job| job != result.job_id)
        {
            return false;
        }
        if self.hide_duplicates && result.is_duplicate {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => {
                let query = query.to_lowercase();
                result.candidate_name.to_lowercase().contains(&query)
                    || result.candidate_email.to_lowercase().contains(&query)
            }
            None => true,
        }
    }
}

/// Score desc, confidence desc, candidate id asc.
pub fn rank_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then(b.ai_confidence.cmp(&a.ai_confidence))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

/// References to the accepted results, already filtered and sorted when
/// `rank` returned. Iterating it any number of times yields the same sequence.
#[derive(Debug, Clone)]
pub struct RankedView<'a> {
    items: Vec<&'a MatchResult>,
}

impl<'a> RankedView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a MatchResult> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<MatchResult> {
        self.items.iter().map(|r| (*r).clone()).collect()
    }
}

/// Filters and sorts up front, O(n log n) in the cached results.
pub fn rank<'a>(results: &'a [MatchResult], filters: &RankFilters) -> RankedView<'a> {
    let mut items: Vec<&MatchResult> = results.iter().filter(|r| filters.accepts(r)).collect();
    items.sort_by(|a, b| rank_order(a, b));
    RankedView { items }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total_candidates: usize,
    pub duplicates: usize,
    pub shortlisted: usize,
    pub auto_shortlisted: usize,
    pub needs_review: usize,
    /// Mean score of non-duplicate results, rounded; 0 when there are none.
    pub average_match_score: u8,
}

pub fn summarize(results: &[MatchResult]) -> JobSummary {
    let originals: Vec<&MatchResult> = results.iter().filter(|r| !r.is_duplicate).collect();
    let average_match_score = if originals.is_empty() {
        0
    } else {
        let total: u32 = originals.iter().map(|r| u32::from(r.match_score)).sum();
        (f64::from(total) / originals.len() as f64).round() as u8
    };

    JobSummary {
        total_candidates: results.len(),
        duplicates: results.len() - originals.len(),
        shortlisted: results
            .iter()
            .filter(|r| r.status == CandidateStatus::Shortlisted)
            .count(),
        auto_shortlisted: results.iter().filter(|r| r.auto_shortlist).count(),
        needs_review: results.iter().filter(|r| r.needs_review).count(),
        average_match_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: u8, confidence: u8) -> MatchResult {
        MatchResult {
            candidate_id: id.to_string(),
            job_id: "job-1".to_string(),
            match_score: score,
            ai_confidence: confidence,
            matched_skills: Vec::new(),
            skill_gaps: Vec::new(),
            other_skills: Vec::new(),
            breakdown: Vec::new(),
            is_duplicate: false,
            duplicate_of: None,
            auto_shortlist: false,
            needs_review: false,
            candidate_name: format!("Person {id}"),
            candidate_email: format!("{id}@example.com"),
            status: CandidateStatus::New,
            applied_at: None,
        }
    }

    fn ids(view: &RankedView) -> Vec<String> {
        view.iter().map(|r| r.candidate_id.clone()).collect()
    }

    #[test]
    fn test_orders_by_score_then_confidence_then_id() {
        let results = vec![
            result("c", 80, 90),
            result("b", 94, 70),
            result("a", 80, 90),
            result("d", 80, 95),
        ];
        let view = rank(&results, &RankFilters::default());
        assert_eq!(ids(&view), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_view_is_restartable_and_repeatable() {
        let results = vec![result("a", 50, 50), result("b", 60, 50)];
        let filters = RankFilters::default();
        let view = rank(&results, &filters);
        assert_eq!(ids(&view), ids(&view));
        assert_eq!(ids(&rank(&results, &filters)), ids(&view));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_view_is_fixed_when_rank_returns() {
        let results = vec![result("a", 50, 50), result("b", 90, 50), result("c", 10, 50)];
        let mut filters = RankFilters {
            min_score: Some(40),
            ..RankFilters::default()
        };
        let view = rank(&results, &filters);
        filters.min_score = Some(95);
        assert_eq!(view.len(), 2);
        assert_eq!(ids(&view), vec!["b", "a"]);
        assert!(rank(&results, &filters).is_empty());
    }

    #[test]
    fn test_filters_are_anded() {
        let mut dup = result("dup", 95, 90);
        dup.is_duplicate = true;
        dup.duplicate_of = Some("a".to_string());
        let mut shortlisted = result("a", 95, 90);
        shortlisted.status = CandidateStatus::Shortlisted;
        let mut other_job = result("x", 99, 99);
        other_job.job_id = "job-2".to_string();
        let results = vec![dup, shortlisted, result("low", 40, 90), other_job];

        let filters = RankFilters {
            min_score: Some(80),
            job_id: Some("job-1".to_string()),
            hide_duplicates: true,
            ..RankFilters::default()
        };
        assert_eq!(ids(&rank(&results, &filters)), vec!["a"]);

        let by_status = RankFilters {
            status: Some(CandidateStatus::New),
            ..RankFilters::default()
        };
        assert_eq!(ids(&rank(&results, &by_status)), vec!["x", "dup", "low"]);
    }

    #[test]
    fn test_search_matches_name_or_email_case_insensitive() {
        let mut a = result("a", 70, 70);
        a.candidate_name = "Sarah Chen".to_string();
        let mut b = result("b", 60, 70);
        b.candidate_email = "SCHEN@work.io".to_string();
        let results = vec![a, b, result("c", 90, 90)];
        let filters = RankFilters {
            search: Some("chen".to_string()),
            ..RankFilters::default()
        };
        assert_eq!(ids(&rank(&results, &filters)), vec!["a", "b"]);

        let blank = RankFilters {
            search: Some("   ".to_string()),
            ..RankFilters::default()
        };
        assert_eq!(rank(&results, &blank).len(), 3);
    }

    #[test]
    fn test_filters_deserialize_from_query_shape() {
        let filters: RankFilters =
            serde_json::from_str(r#"{"status": "shortlisted", "min_score": 80}"#).unwrap();
        assert_eq!(filters.status, Some(CandidateStatus::Shortlisted));
        assert_eq!(filters.min_score, Some(80));
        assert!(!filters.hide_duplicates);
    }

    #[test]
    fn test_ranking_does_not_mutate_cache() {
        let results = vec![result("b", 10, 10), result("a", 90, 90)];
        let before = results.clone();
        let _ = rank(&results, &RankFilters::default()).to_vec();
        assert_eq!(results, before);
    }

    #[test]
    fn test_summary() {
        let mut a = result("a", 90, 90);
        a.auto_shortlist = true;
        a.status = CandidateStatus::Shortlisted;
        let mut b = result("b", 71, 60);
        b.needs_review = true;
        let mut dup = result("dup", 90, 90);
        dup.is_duplicate = true;
        let summary = summarize(&[a, b, dup]);
        assert_eq!(
            summary,
            JobSummary {
                total_candidates: 3,
                duplicates: 1,
                shortlisted: 1,
                auto_shortlisted: 1,
                needs_review: 1,
                average_match_score: 81,
            }
        );
        assert_eq!(summarize(&[]), JobSummary::default());
    }
}
