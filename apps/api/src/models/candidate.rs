use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSkill {
    pub name: String,
    #[serde(default)]
    pub years_of_experience: Option<f64>,
}

impl CandidateSkill {
    pub fn new(name: impl Into<String>, years_of_experience: Option<f64>) -> Self {
        Self {
            name: name.into(),
            years_of_experience,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    New,
    Reviewed,
    Shortlisted,
    Rejected,
    Interviewed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// A parsed resume submitted against one job. Produced by the upstream
/// parser; an unparseable document arrives with empty skill/experience lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<CandidateSkill>,
    #[serde(default)]
    pub experience_entries: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education_entries: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    /// Content signature of the source document; duplicate signal only.
    #[serde(default)]
    pub raw_text_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub status: CandidateStatus,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

impl CandidateRecord {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id.trim().is_empty() {
            return Err(AppError::invalid("candidate id cannot be empty"));
        }
        if self.job_id.trim().is_empty() {
            return Err(AppError::invalid(format!(
                "candidate {}: job_id cannot be empty",
                self.id
            )));
        }
        for skill in &self.skills {
            if skill.name.trim().is_empty() {
                return Err(AppError::invalid(format!(
                    "candidate {}: skill name cannot be empty",
                    self.id
                )));
            }
            if let Some(years) = skill.years_of_experience {
                if !years.is_finite() || years < 0.0 {
                    return Err(AppError::invalid(format!(
                        "candidate {}: years_of_experience for '{}' must be a non-negative number",
                        self.id, skill.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The declared fingerprint, or one derived from `resume_text` when the
    /// parser supplied text but no signature.
    pub fn effective_fingerprint(&self) -> Option<String> {
        if let Some(fp) = self
            .raw_text_fingerprint
            .as_deref()
            .map(str::trim)
            .filter(|fp| !fp.is_empty())
        {
            return Some(fp.to_string());
        }
        self.resume_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(content_fingerprint)
    }
}

/// blake3 hex digest of lower-cased, whitespace-collapsed text, so trivial
/// re-formatting of the same document yields the same signature.
pub fn content_fingerprint(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    blake3::hash(collapsed.as_bytes()).to_hex().to_string()
}
