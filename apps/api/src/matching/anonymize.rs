//! Bias-reduction projection: the view of a candidate the scorer sees when
//! bias reduction is enabled. Identity and demographic-proxy fields are
//! blanked; skills, years and experience content are kept as-is.

use crate::models::candidate::CandidateRecord;

pub fn anonymize(record: &CandidateRecord) -> CandidateRecord {
    CandidateRecord {
        name: String::new(),
        email: String::new(),
        phone: String::new(),
        location: String::new(),
        education_entries: record
            .education_entries
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.institution.clear();
                entry
            })
            .collect(),
        ..record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fixtures::frontend_pool;
    use crate::models::candidate::EducationEntry;

    #[test]
    fn test_identity_fields_blanked_skills_kept() {
        let mut original = frontend_pool().remove(0);
        original.education_entries.push(EducationEntry {
            degree: "B.S. Computer Science".to_string(),
            institution: "Stanford University".to_string(),
            year: "2018".to_string(),
        });
        let view = anonymize(&original);

        assert!(view.name.is_empty());
        assert!(view.email.is_empty());
        assert!(view.phone.is_empty());
        assert!(view.location.is_empty());
        assert!(view.education_entries[0].institution.is_empty());
        assert_eq!(view.education_entries[0].degree, "B.S. Computer Science");
        assert_eq!(view.skills, original.skills);
        assert_eq!(view.id, original.id);
        assert_eq!(view.job_id, original.job_id);
        // the source record is untouched
        assert_eq!(original.name, "Sarah Chen");
    }
}
