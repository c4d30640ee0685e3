use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::role::decode_list;

/// Canonical parsed form of one applicant.
///
/// `external_id` is always non-empty: either the document-declared identifier
/// (with the `C` prefix enforced) or a synthesized `C<digits>` value. List
/// entries are free text, never sub-parsed further, and never sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub external_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: String,
    pub certifications: String,
    pub languages: String,
    pub created_at: NaiveDateTime,
}

impl CandidateRow {
    pub fn into_record(self) -> CandidateRecord {
        CandidateRecord {
            external_id: self.external_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            summary: self.summary,
            skills: decode_list(&self.skills),
            experience: decode_list(&self.experience),
            education: decode_list(&self.education),
            certifications: decode_list(&self.certifications),
            languages: decode_list(&self.languages),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_round_trips_list_columns() {
        let row = CandidateRow {
            id: 7,
            external_id: "C1234".to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            summary: String::new(),
            skills: r#"["Python","SQL"]"#.to_string(),
            experience: r#"["Engineer at Acme (2018-2023)"]"#.to_string(),
            education: "[]".to_string(),
            certifications: "[]".to_string(),
            languages: r#"["English"]"#.to_string(),
            created_at: NaiveDateTime::default(),
        };

        let record = row.into_record();
        assert_eq!(record.skills, vec!["Python", "SQL"]);
        assert_eq!(record.languages, vec!["English"]);
        assert!(record.education.is_empty());
    }
}
