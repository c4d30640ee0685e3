use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical parsed form of one open position.
///
/// Invariants enforced by the normalizer: the numeric field is always a
/// non-negative integer and list fields are always present, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub title: String,
    pub company: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub required_experience_years: u32,
    /// Free text ("Bachelor's degree in CS"); mapped to an ordinal at match time.
    pub required_education_level: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub required_skills: String,
    pub preferred_skills: String,
    pub required_experience: i64,
    pub required_education: String,
    pub responsibilities: String,
    pub created_at: NaiveDateTime,
}

impl RoleRow {
    /// Decodes the JSON list columns back into the canonical record.
    /// An unreadable column degrades to an empty list rather than failing.
    pub fn into_record(self) -> RoleRequirement {
        RoleRequirement {
            title: self.title,
            company: self.company,
            required_skills: decode_list(&self.required_skills),
            preferred_skills: decode_list(&self.preferred_skills),
            required_experience_years: self.required_experience.max(0) as u32,
            required_education_level: self.required_education,
            responsibilities: decode_list(&self.responsibilities),
        }
    }
}

pub(crate) fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_decodes_json_list_columns() {
        let row = RoleRow {
            id: 1,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            required_skills: r#"["Rust","SQL"]"#.to_string(),
            preferred_skills: "[]".to_string(),
            required_experience: 3,
            required_education: "Bachelor's degree".to_string(),
            responsibilities: r#"["Build services"]"#.to_string(),
            created_at: NaiveDateTime::default(),
        };

        let record = row.into_record();
        assert_eq!(record.required_skills, vec!["Rust", "SQL"]);
        assert!(record.preferred_skills.is_empty());
        assert_eq!(record.required_experience_years, 3);
    }

    #[test]
    fn test_row_with_corrupt_list_column_degrades_to_empty() {
        let row = RoleRow {
            id: 1,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            required_skills: "not json".to_string(),
            preferred_skills: "[]".to_string(),
            required_experience: -2,
            required_education: String::new(),
            responsibilities: "[]".to_string(),
            created_at: NaiveDateTime::default(),
        };

        let record = row.into_record();
        assert!(record.required_skills.is_empty());
        // Negative values cannot survive into the canonical record
        assert_eq!(record.required_experience_years, 0);
    }
}
