//! Confidence estimator: how complete and unambiguous the evidence behind a
//! match score is. Independent of the score's magnitude: a clearly
//! unqualified candidate scores low with high confidence.
//!
//! confidence = 100 × (base + (1 − base) × evidence) × (1 − fuzzy_penalty × fuzzy_fraction)
//!
//! * `evidence`: share of matched requirements carrying years-of-experience.
//!   With nothing matched, the share of the candidate's own skills that carry
//!   years stands in, so a well-described but unrelated profile still reads as
//!   a confident low score.
//! * `fuzzy_fraction`: share of requirements resolved by a near-spelling.

use crate::matching::settings::ConfidencePolicy;
use crate::matching::skills::MatchedSet;
use crate::models::candidate::CandidateSkill;
use crate::models::job::RequirementSet;

fn years_ratio(years: impl Iterator<Item = Option<f64>>) -> f64 {
    let (with, total) = years.fold((0usize, 0usize), |(with, total), y| {
        (with + usize::from(y.is_some()), total + 1)
    });
    if total == 0 {
        0.0
    } else {
        with as f64 / total as f64
    }
}

pub fn confidence(
    matched: &MatchedSet,
    requirements: &RequirementSet,
    candidate_skills: &[CandidateSkill],
    policy: &ConfidencePolicy,
) -> u8 {
    if requirements.is_empty() {
        return 0;
    }

    let evidence = if matched.matched_count() > 0 {
        years_ratio(matched.matched().map(|m| m.years_of_experience))
    } else {
        years_ratio(candidate_skills.iter().map(|s| s.years_of_experience))
    };
    let fuzzy_fraction = matched.fuzzy_count() as f64 / requirements.len() as f64;

    let value = (policy.base + (1.0 - policy.base) * evidence)
        * (1.0 - policy.fuzzy_penalty * fuzzy_fraction);

    (value * 100.0).round().clamp(0.0, 100.0) as u8
}
