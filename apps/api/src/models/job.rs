use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::taxonomy::normalize_skill;

/// Upper bound for a single requirement weight.
pub const MAX_WEIGHT: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub weight: i32,
}

impl SkillRequirement {
    pub fn new(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// A job as the engine sees it: id, weighted skill requirements, minimum experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub requirements: Vec<SkillRequirement>,
    /// Years of experience expected per required skill. 0 disables experience scaling.
    #[serde(default)]
    pub min_experience: f64,
}

impl Job {
    /// Checks the job's shape and builds its requirement set.
    pub fn validate(&self) -> Result<RequirementSet, AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::invalid("job id cannot be empty"));
        }
        if !self.min_experience.is_finite() || self.min_experience < 0.0 {
            return Err(AppError::invalid(format!(
                "job {}: min_experience must be a non-negative number",
                self.id
            )));
        }
        RequirementSet::new(&self.requirements)
    }
}

/// A requirement after its name has been canonicalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRequirement {
    /// Name as the job author wrote it, kept for display.
    pub name: String,
    pub token: String,
    pub weight: u32,
}

/// Unique-by-token set of requirements owned by one job. Built wholesale,
/// never patched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RequirementSet {
    entries: Vec<NormalizedRequirement>,
}

impl RequirementSet {
    pub fn new(requirements: &[SkillRequirement]) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(requirements.len());

        for req in requirements {
            if req.name.trim().is_empty() {
                return Err(AppError::invalid("skill requirement name cannot be empty"));
            }
            if req.weight < 0 {
                return Err(AppError::invalid(format!(
                    "skill requirement '{}' has negative weight {}",
                    req.name, req.weight
                )));
            }
            if req.weight > MAX_WEIGHT {
                return Err(AppError::invalid(format!(
                    "skill requirement '{}' has weight {} above {MAX_WEIGHT}",
                    req.name, req.weight
                )));
            }

            let token = normalize_skill(&req.name);
            if !seen.insert(token.clone()) {
                return Err(AppError::invalid(format!(
                    "duplicate skill requirement '{}' (normalized '{token}')",
                    req.name
                )));
            }

            entries.push(NormalizedRequirement {
                name: req.name.trim().to_string(),
                token,
                weight: req.weight as u32,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[NormalizedRequirement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight_total(&self) -> u32 {
        self.entries.iter().map(|r| r.weight).sum()
    }

    /// Advisory notice when declared weights don't add up to 100.
    /// Scoring normalizes either way.
    /// Heaviest single weight, 0 for an empty set.
    pub fn max_weight(&self) -> u32 {
        self.entries.iter().map(|r| r.weight).max().unwrap_or(0)
    }

    pub fn weight_warning(&self) -> Option<String> {
        let total = self.weight_total();
        if self.entries.is_empty() || total == 100 {
            return None;
        }
        Some(format!(
            "Requirement weights total {total}, not 100; weights are normalized at scoring time"
        ))
    }
}
