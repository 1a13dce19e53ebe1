//! Shared test data: the frontend job and its five-applicant pool.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::candidate::{CandidateRecord, CandidateSkill, CandidateStatus};
use crate::models::job::{Job, SkillRequirement};

pub fn applied(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single()
}

/// A bare record on `job-1` with a unique e-mail and no phone or skills.
pub fn candidate(id: &str, name: &str, location: &str) -> CandidateRecord {
    CandidateRecord {
        id: id.to_string(),
        job_id: "job-1".to_string(),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        phone: String::new(),
        location: location.to_string(),
        skills: Vec::new(),
        experience_entries: Vec::new(),
        education_entries: Vec::new(),
        projects: Vec::new(),
        raw_text_fingerprint: None,
        resume_text: None,
        status: CandidateStatus::New,
        applied_at: None,
    }
}

pub fn frontend_job() -> Job {
    Job {
        id: "job-1".to_string(),
        title: Some("Senior Frontend Engineer".to_string()),
        requirements: vec![
            SkillRequirement::new("React", 30),
            SkillRequirement::new("TypeScript", 25),
            SkillRequirement::new("Next.js", 20),
            SkillRequirement::new("Tailwind", 15),
            SkillRequirement::new("GraphQL", 10),
        ],
        min_experience: 5.0,
    }
}

fn with_profile(
    mut record: CandidateRecord,
    email: &str,
    phone: &str,
    skills: &[(&str, f64)],
    date: (i32, u32, u32),
) -> CandidateRecord {
    record.email = email.to_string();
    record.phone = phone.to_string();
    record.skills = skills
        .iter()
        .map(|(name, years)| CandidateSkill::new(*name, Some(*years)))
        .collect();
    record.applied_at = applied(date.0, date.1, date.2);
    record
}

/// cand-1 and cand-5 are the same applicant under two e-mail addresses.
pub fn frontend_pool() -> Vec<CandidateRecord> {
    vec![
        with_profile(
            candidate("cand-1", "Sarah Chen", "San Francisco, CA"),
            "sarah.chen@email.com",
            "+1 (555) 123-4567",
            &[
                ("React", 6.0),
                ("TypeScript", 5.0),
                ("Next.js", 4.0),
                ("Tailwind CSS", 3.0),
                ("GraphQL", 3.0),
                ("Node.js", 4.0),
            ],
            (2024, 1, 16),
        ),
        with_profile(
            candidate("cand-2", "Michael Rodriguez", "Austin, TX"),
            "m.rodriguez@email.com",
            "+1 (555) 234-5678",
            &[
                ("React", 5.0),
                ("TypeScript", 4.0),
                ("Next.js", 2.0),
                ("Tailwind CSS", 2.0),
                ("Vue.js", 3.0),
            ],
            (2024, 1, 17),
        ),
        with_profile(
            candidate("cand-3", "Emily Watson", "Seattle, WA"),
            "emily.watson@email.com",
            "+1 (555) 345-6789",
            &[
                ("React", 4.0),
                ("TypeScript", 3.0),
                ("Tailwind CSS", 2.0),
                ("GraphQL", 2.0),
            ],
            (2024, 1, 18),
        ),
        with_profile(
            candidate("cand-4", "James Kim", "Los Angeles, CA"),
            "james.k@email.com",
            "+1 (555) 456-7890",
            &[("React", 3.0), ("TypeScript", 2.0), ("CSS/SCSS", 4.0)],
            (2024, 1, 19),
        ),
        with_profile(
            candidate("cand-5", "Sarah Chen", "San Francisco, CA"),
            "s.chen.work@email.com",
            "+1 (555) 999-8888",
            &[
                ("React", 6.0),
                ("TypeScript", 5.0),
                ("Next.js", 4.0),
                ("Tailwind CSS", 3.0),
                ("GraphQL", 3.0),
            ],
            (2024, 1, 20),
        ),
    ]
}
