use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// A requirement satisfied by one of the candidate's skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSkill {
    pub requirement: String,
    pub candidate_skill: String,
    pub years_of_experience: Option<f64>,
    pub kind: MatchKind,
    /// 1.0 for exact matches.
    pub similarity: f64,
}

/// One requirement's share of the match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub requirement: String,
    pub normalized_weight: f64,
    pub skill_factor: f64,
    pub contribution: f64,
}

/// Derived, recomputed output for a (candidate, job) pair. Never edited by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub job_id: String,
    pub match_score: u8,
    pub ai_confidence: u8,
    pub matched_skills: Vec<MatchedSkill>,
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub other_skills: Vec<String>,
    #[serde(default)]
    pub breakdown: Vec<ScoreContribution>,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub duplicate_of: Option<String>,
    #[serde(default)]
    pub auto_shortlist: bool,
    #[serde(default)]
    pub needs_review: bool,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateSignal {
    // strong
    NameAndLocation,
    Fingerprint,
    Email,
    // weak
    FuzzyName,
    SkillOverlap,
    Phone,
}

impl DuplicateSignal {
    pub fn is_strong(self) -> bool {
        matches!(
            self,
            DuplicateSignal::NameAndLocation | DuplicateSignal::Fingerprint | DuplicateSignal::Email
        )
    }
}

/// A pairwise link that put two records in the same cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateLink {
    pub left: String,
    pub right: String,
    pub signals: Vec<DuplicateSignal>,
}

/// Records believed to be the same applicant. Transient; rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub canonical_id: String,
    /// Canonical member first, then the rest in canonical order.
    pub member_ids: Vec<String>,
    pub links: Vec<DuplicateLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateStatus {
    pub is_duplicate: bool,
    pub duplicate_of: Option<String>,
}
