//! Engine settings: the explicit configuration object handed to every
//! scoring and duplicate-detection call. Nothing in `matching` reads ambient state.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Which years a matched skill must reach for full credit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceScaling {
    /// The job's minimum applies to the heaviest requirement; lighter ones
    /// expect proportionally fewer years (`min * weight / max_weight`).
    #[default]
    WeightProportional,
    /// Every requirement expects the job's full minimum.
    PerSkill,
}

/// How candidate years-of-experience scale a matched skill's credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperiencePolicy {
    pub scaling: ExperienceScaling,
    /// Lowest credit a matched skill can earn, regardless of years.
    pub floor: f64,
    /// Credit for a matched skill that carries no years-of-experience evidence
    /// on a job that states a minimum. Missing evidence lowers confidence instead.
    pub unknown_experience_credit: f64,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            scaling: ExperienceScaling::default(),
            floor: 0.5,
            unknown_experience_credit: 1.0,
        }
    }
}

/// Shape of the AI-confidence estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Confidence when no matched requirement carries years evidence.
    pub base: f64,
    /// Fraction of confidence removed when every requirement resolved fuzzily.
    pub fuzzy_penalty: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            base: 0.4,
            fuzzy_penalty: 0.5,
        }
    }
}

/// Thresholds for the weak duplicate signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateThresholds {
    /// Jaro-Winkler similarity of normalized names.
    pub name_similarity: f64,
    /// Jaccard overlap of normalized skill tokens.
    pub skill_overlap: f64,
    /// Weak signals needed to link two records without a strong signal.
    pub min_weak_signals: usize,
}

impl Default for DuplicateThresholds {
    fn default() -> Self {
        Self {
            name_similarity: 0.9,
            skill_overlap: 0.8,
            min_weak_signals: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub auto_shortlist_threshold: u8,
    pub confidence_threshold: u8,
    /// Score an anonymized projection of each candidate.
    pub bias_reduction_enabled: bool,
    pub duplicate_detection_enabled: bool,
    /// Minimum normalized edit-distance similarity for a fuzzy skill match.
    pub fuzzy_skill_threshold: f64,
    pub experience: ExperiencePolicy,
    pub confidence: ConfidencePolicy,
    pub duplicates: DuplicateThresholds,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_shortlist_threshold: 85,
            confidence_threshold: 70,
            bias_reduction_enabled: true,
            duplicate_detection_enabled: true,
            fuzzy_skill_threshold: 0.85,
            experience: ExperiencePolicy::default(),
            confidence: ConfidencePolicy::default(),
            duplicates: DuplicateThresholds::default(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auto_shortlist_threshold > 100 {
            return Err(AppError::invalid(
                "auto_shortlist_threshold must be within 0..=100",
            ));
        }
        if self.confidence_threshold > 100 {
            return Err(AppError::invalid("confidence_threshold must be within 0..=100"));
        }
        check_unit("fuzzy_skill_threshold", self.fuzzy_skill_threshold)?;
        check_unit("experience.floor", self.experience.floor)?;
        check_unit(
            "experience.unknown_experience_credit",
            self.experience.unknown_experience_credit,
        )?;
        if self.experience.unknown_experience_credit < self.experience.floor {
            return Err(AppError::invalid(
                "experience.unknown_experience_credit must not be below experience.floor",
            ));
        }
        check_unit("confidence.base", self.confidence.base)?;
        check_unit("confidence.fuzzy_penalty", self.confidence.fuzzy_penalty)?;
        check_unit("duplicates.name_similarity", self.duplicates.name_similarity)?;
        check_unit("duplicates.skill_overlap", self.duplicates.skill_overlap)?;
        if self.duplicates.min_weak_signals == 0 {
            return Err(AppError::invalid(
                "duplicates.min_weak_signals must be at least 1",
            ));
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AppError::invalid(format!(
            "{field} must be within 0.0..=1.0, got {value}"
        )))
    }
}
