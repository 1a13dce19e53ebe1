//! Skill matcher: resolves each job requirement against a candidate's
//! extracted skills.
//!
//! Every requirement resolves to exactly one of matched or unmatched. An exact
//! token match always wins; only when none exists is a near-spelling accepted
//! via normalized Damerau-Levenshtein similarity at or above the fuzzy threshold.
//! Among several entries of the same kind, the one earning the most credit
//! under the active `ExperiencePolicy` is chosen.

use std::collections::HashSet;

use serde::Serialize;

use crate::matching::scoring::{required_years, skill_factor};
use crate::matching::settings::ExperiencePolicy;
use crate::matching::taxonomy::normalize_skill;
use crate::models::candidate::CandidateSkill;
use crate::models::job::RequirementSet;
use crate::models::match_result::{MatchKind, MatchedSkill};

/// Tokens shorter than this only ever match exactly ("go" vs "js").
const MIN_FUZZY_TOKEN_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementResolution {
    pub requirement: String,
    pub token: String,
    pub weight: u32,
    pub matched: Option<MatchedSkill>,
}

/// Output of `match_skills`, one resolution per requirement in requirement order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MatchedSet {
    pub resolutions: Vec<RequirementResolution>,
    /// Candidate skills that answer no requirement. Display only.
    pub other_skills: Vec<String>,
}

impl MatchedSet {
    pub fn matched(&self) -> impl Iterator<Item = &MatchedSkill> {
        self.resolutions.iter().filter_map(|r| r.matched.as_ref())
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    pub fn fuzzy_count(&self) -> usize {
        self.matched().filter(|m| m.kind == MatchKind::Fuzzy).count()
    }

    /// Requirement names with no matching candidate skill.
    pub fn gaps(&self) -> Vec<String> {
        self.resolutions
            .iter()
            .filter(|r| r.matched.is_none())
            .map(|r| r.requirement.clone())
            .collect()
    }
}

/// Similarity in `[0, 1]` between two canonical tokens.
pub fn token_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.chars().count() < MIN_FUZZY_TOKEN_LEN || b.chars().count() < MIN_FUZZY_TOKEN_LEN {
        return 0.0;
    }
    strsim::normalized_damerau_levenshtein(a, b)
}

pub fn match_skills(
    requirements: &RequirementSet,
    candidate_skills: &[CandidateSkill],
    fuzzy_threshold: f64,
    min_experience: f64,
    experience: &ExperiencePolicy,
) -> MatchedSet {
    let tokens: Vec<(usize, String)> = candidate_skills
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.name.trim().is_empty())
        .map(|(i, s)| (i, normalize_skill(&s.name)))
        .collect();

    let max_weight = requirements.max_weight();
    let mut used = vec![false; candidate_skills.len()];
    let mut resolutions = Vec::with_capacity(requirements.len());

    for req in requirements.entries() {
        let required = required_years(req.weight, max_weight, min_experience, experience);
        let years = |i: usize| candidate_skills[i].years_of_experience;
        let credit = |i: usize| skill_factor(years(i), required, experience);

        // Most credit, then years evidence present, then higher similarity,
        // then the earlier listed skill. Adding an entry of the same kind
        // never lowers the credit a requirement already earns.
        let pick = |a: &(usize, f64), b: &(usize, f64)| {
            credit(a.0)
                .total_cmp(&credit(b.0))
                .then(years(a.0).is_some().cmp(&years(b.0).is_some()))
                .then(a.1.total_cmp(&b.1))
                .then(b.0.cmp(&a.0))
        };

        let exact = tokens
            .iter()
            .filter(|(_, t)| *t == req.token)
            .map(|(i, _)| (*i, 1.0))
            .max_by(pick);

        let resolved = exact
            .map(|(i, sim)| (i, sim, MatchKind::Exact))
            .or_else(|| {
                tokens
                    .iter()
                    .map(|(i, t)| (*i, token_similarity(&req.token, t)))
                    .filter(|(_, sim)| *sim >= fuzzy_threshold && *sim > 0.0)
                    .max_by(pick)
                    .map(|(i, sim)| (i, sim, MatchKind::Fuzzy))
            });

        let matched = resolved.map(|(i, similarity, kind)| {
            used[i] = true;
            let skill = &candidate_skills[i];
            MatchedSkill {
                requirement: req.name.clone(),
                candidate_skill: skill.name.trim().to_string(),
                years_of_experience: skill.years_of_experience,
                kind,
                similarity,
            }
        });

        resolutions.push(RequirementResolution {
            requirement: req.name.clone(),
            token: req.token.clone(),
            weight: req.weight,
            matched,
        });
    }

    let mut seen: HashSet<String> = tokens
        .iter()
        .filter(|(i, _)| used[*i])
        .map(|(_, t)| t.clone())
        .collect();
    let other_skills = tokens
        .iter()
        .filter(|(i, _)| !used[*i])
        .filter(|(_, t)| seen.insert(t.clone()))
        .map(|(i, _)| candidate_skills[*i].name.trim().to_string())
        .collect();

    MatchedSet {
        resolutions,
        other_skills,
    }
}
