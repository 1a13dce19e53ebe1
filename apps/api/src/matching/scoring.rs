//! Weighted scorer: turns a `MatchedSet` into a bounded 0–100 match score.
//!
//! score = round(100 × Σ (wᵢ / W) × factorᵢ), clamped to [0, 100]
//!
//! `W` is the sum of declared weights, so scaling every weight by the same
//! factor leaves the score unchanged. `factorᵢ` is 0 for a gap and lies in
//! `[floor, 1]` for a matched skill. An empty requirement set scores 0.

use serde::{Deserialize, Serialize};

use crate::matching::settings::{ExperiencePolicy, ExperienceScaling};
use crate::matching::skills::MatchedSet;
use crate::models::job::RequirementSet;
use crate::models::match_result::ScoreContribution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub contributions: Vec<ScoreContribution>,
}

/// Credit for a matched skill given the years it is expected to reach.
pub fn skill_factor(years: Option<f64>, required_years: f64, policy: &ExperiencePolicy) -> f64 {
    if required_years <= 0.0 {
        return 1.0;
    }
    match years {
        None => policy.unknown_experience_credit,
        Some(y) => (y / required_years).min(1.0).max(policy.floor),
    }
}

/// Years a requirement of `weight` expects for full credit.
pub fn required_years(
    weight: u32,
    max_weight: u32,
    min_experience: f64,
    policy: &ExperiencePolicy,
) -> f64 {
    match policy.scaling {
        ExperienceScaling::PerSkill => min_experience,
        ExperienceScaling::WeightProportional if max_weight == 0 => 0.0,
        ExperienceScaling::WeightProportional => {
            min_experience * weight as f64 / max_weight as f64
        }
    }
}

/// Rounds away float noise before the final integer rounding, so that
/// mathematically equal inputs (e.g. uniformly scaled weights) round alike.
fn stable_round(value: f64) -> f64 {
    ((value * 1e6).round() / 1e6).round()
}

pub fn score(
    matched: &MatchedSet,
    requirements: &RequirementSet,
    min_experience: f64,
    policy: &ExperiencePolicy,
) -> ScoreBreakdown {
    debug_assert_eq!(matched.resolutions.len(), requirements.len());

    let total_weight = requirements.weight_total();
    if requirements.is_empty() || total_weight == 0 {
        tracing::debug!(
            requirements = requirements.len(),
            "no weighted requirements; match score is 0"
        );
        return ScoreBreakdown {
            score: 0,
            contributions: Vec::new(),
        };
    }

    let max_weight = requirements.max_weight();

    let contributions: Vec<ScoreContribution> = matched
        .resolutions
        .iter()
        .map(|res| {
            let normalized_weight = res.weight as f64 / total_weight as f64;
            let skill_factor = match &res.matched {
                Some(m) => skill_factor(
                    m.years_of_experience,
                    required_years(res.weight, max_weight, min_experience, policy),
                    policy,
                ),
                None => 0.0,
            };
            ScoreContribution {
                requirement: res.requirement.clone(),
                normalized_weight,
                skill_factor,
                contribution: normalized_weight * skill_factor,
            }
        })
        .collect();

    let raw: f64 = contributions.iter().map(|c| c.contribution).sum::<f64>() * 100.0;
    let score = stable_round(raw).clamp(0.0, 100.0) as u8;

    ScoreBreakdown {
        score,
        contributions,
    }
}
