// Sentinel scrubbing and schema coercion for extracted records.
// Only this module interprets the "undefined"/"None" placeholder spellings;
// everything downstream sees schema-valid records with real defaults.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::models::candidate::CandidateRecord;
use crate::models::role::RoleRequirement;

/// Display default for a role whose document never names the position. The
/// role extractor's gate also reads it as "no title found".
pub const UNTITLED_POSITION: &str = "Untitled Position";
const UNKNOWN_COMPANY: &str = "Unknown Company";

static FIRST_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Loosely-typed candidate fields as they come out of the regex cascades or
/// a text-completion response. Aliases cover the TitleCase key spellings
/// completion models tend to produce.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCandidate {
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "Phone")]
    pub phone: Option<String>,
    #[serde(
        alias = "candidate_id",
        alias = "Candidate_ID",
        alias = "CandidateID",
        alias = "id"
    )]
    pub external_id: Option<String>,
    #[serde(alias = "Summary")]
    pub summary: Option<String>,
    #[serde(alias = "Skills")]
    pub skills: RawList,
    #[serde(alias = "Experience")]
    pub experience: RawList,
    #[serde(alias = "Education")]
    pub education: RawList,
    #[serde(alias = "Certifications")]
    pub certifications: RawList,
    #[serde(alias = "Languages")]
    pub languages: RawList,
}

/// Loosely-typed role fields. `required_experience` stays a raw JSON value
/// because models return it as a number, a string, or prose.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRole {
    #[serde(alias = "title", alias = "Title", alias = "Job Title", alias = "job_title")]
    pub title: Option<String>,
    #[serde(
        alias = "Company",
        alias = "Company Name",
        alias = "company_name",
        alias = "Employer"
    )]
    pub company: Option<String>,
    #[serde(alias = "Required Skills", alias = "RequiredSkills", alias = "Skills")]
    pub required_skills: RawList,
    #[serde(alias = "Preferred Skills", alias = "PreferredSkills", alias = "Nice to Have")]
    pub preferred_skills: RawList,
    #[serde(
        alias = "required_experience_years",
        alias = "Required Experience",
        alias = "Years of Experience",
        alias = "Experience"
    )]
    pub required_experience: Option<Value>,
    #[serde(
        alias = "required_education_level",
        alias = "Required Education",
        alias = "Education"
    )]
    pub required_education: Option<String>,
    #[serde(alias = "Responsibilities", alias = "Job Responsibilities", alias = "Duties")]
    pub responsibilities: RawList,
}

/// A field that should be a list but often arrives as a serialized string,
/// a lone scalar, or null. Untagged variants are tried top to bottom.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawList {
    Items(Vec<Value>),
    Text(String),
    Other(Value),
}

impl Default for RawList {
    fn default() -> Self {
        RawList::Items(Vec::new())
    }
}

impl RawList {
    pub fn from_strings(items: Vec<String>) -> Self {
        RawList::Items(items.into_iter().map(Value::String).collect())
    }

    fn into_strings(self) -> Vec<String> {
        match self {
            RawList::Items(items) => items.into_iter().filter_map(coerce_item).collect(),
            RawList::Text(text) => match clean_string(&text) {
                None => Vec::new(),
                Some(text) if text.starts_with('[') => {
                    match serde_json::from_str::<Vec<Value>>(&text) {
                        Ok(items) => items.into_iter().filter_map(coerce_item).collect(),
                        Err(_) => vec![text],
                    }
                }
                Some(text) => vec![text],
            },
            RawList::Other(value) => coerce_item(value).map_or_else(Vec::new, |item| vec![item]),
        }
    }
}

fn coerce_item(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => clean_string(&s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Nested objects and arrays are kept verbatim as JSON text rather
        // than dropped; the matching engine treats entries as free text.
        other => serde_json::to_string(&other).ok(),
    }
}

/// Trim and scrub the placeholder spellings upstream tools use for "no
/// value". Returns `None` when nothing usable remains.
pub fn clean_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "None" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Candidate identifiers are non-empty and carry a `C` prefix. Missing or
/// scrubbed ids get one synthesized from the clock.
pub fn normalize_external_id(raw: Option<&str>) -> String {
    match raw.and_then(clean_string) {
        Some(id) if id.starts_with('C') => id,
        Some(id) => format!("C{id}"),
        None => format!("C{}", Utc::now().timestamp() % 10000),
    }
}

/// Coerce a raw candidate into a schema-valid record. Never fails: every
/// unusable field falls back to its default instead of propagating an
/// error, and running the output back through changes nothing.
pub fn normalize_candidate(raw: RawCandidate) -> CandidateRecord {
    CandidateRecord {
        external_id: normalize_external_id(raw.external_id.as_deref()),
        name: raw.name.as_deref().and_then(clean_string).unwrap_or_default(),
        email: raw.email.as_deref().and_then(clean_string).unwrap_or_default(),
        phone: raw.phone.as_deref().and_then(clean_string).unwrap_or_default(),
        summary: raw.summary.as_deref().and_then(clean_string).unwrap_or_default(),
        skills: raw.skills.into_strings(),
        experience: raw.experience.into_strings(),
        education: raw.education.into_strings(),
        certifications: raw.certifications.into_strings(),
        languages: raw.languages.into_strings(),
    }
}

/// Coerce a raw role into a schema-valid requirement, defaulting the title
/// and company so downstream display code never renders a blank.
pub fn normalize_role(raw: RawRole) -> RoleRequirement {
    RoleRequirement {
        title: raw
            .title
            .as_deref()
            .and_then(clean_string)
            .unwrap_or_else(|| UNTITLED_POSITION.to_string()),
        company: raw
            .company
            .as_deref()
            .and_then(clean_string)
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
        required_skills: raw.required_skills.into_strings(),
        preferred_skills: raw.preferred_skills.into_strings(),
        required_experience_years: parse_years(raw.required_experience.as_ref()),
        required_education_level: raw
            .required_education
            .as_deref()
            .and_then(clean_string)
            .unwrap_or_default(),
        responsibilities: raw.responsibilities.into_strings(),
    }
}

fn parse_years(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.max(0.0) as u32).unwrap_or(0),
        Some(Value::String(s)) => first_int(s),
        _ => 0,
    }
}

fn first_int(text: &str) -> u32 {
    FIRST_INT
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reraw(record: &CandidateRecord) -> RawCandidate {
        RawCandidate {
            name: Some(record.name.clone()),
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            external_id: Some(record.external_id.clone()),
            summary: Some(record.summary.clone()),
            skills: RawList::from_strings(record.skills.clone()),
            experience: RawList::from_strings(record.experience.clone()),
            education: RawList::from_strings(record.education.clone()),
            certifications: RawList::from_strings(record.certifications.clone()),
            languages: RawList::from_strings(record.languages.clone()),
        }
    }

    #[test]
    fn test_sentinels_become_defaults() {
        let raw = RawCandidate {
            name: Some("undefined".into()),
            email: Some("  ".into()),
            phone: Some("None".into()),
            skills: RawList::Text("undefined".into()),
            ..Default::default()
        };
        let record = normalize_candidate(raw);
        assert_eq!(record.name, "");
        assert_eq!(record.email, "");
        assert_eq!(record.phone, "");
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_external_id_synthesis_and_prefix() {
        assert_eq!(normalize_external_id(Some("C042")), "C042");
        assert_eq!(normalize_external_id(Some("17")), "C17");
        let synthesized = normalize_external_id(None);
        assert!(synthesized.starts_with('C'));
        let digits = &synthesized[1..];
        assert!((1..=4).contains(&digits.len()));
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        // The literal sentinel must synthesize too, not become "Cundefined".
        assert!(normalize_external_id(Some("undefined"))[1..]
            .chars()
            .all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_list_coercion_shapes() {
        let raw: RawList = serde_json::from_value(json!(["Rust", null, 7, "None"])).unwrap();
        assert_eq!(raw.into_strings(), vec!["Rust".to_string(), "7".to_string()]);

        let raw: RawList = serde_json::from_value(json!("[\"Rust\", \"Go\"]")).unwrap();
        assert_eq!(raw.into_strings(), vec!["Rust".to_string(), "Go".to_string()]);

        let raw: RawList = serde_json::from_value(json!("Rust")).unwrap();
        assert_eq!(raw.into_strings(), vec!["Rust".to_string()]);

        // Looks serialized but is broken: kept whole rather than dropped.
        let raw: RawList = serde_json::from_value(json!("[broken")).unwrap();
        assert_eq!(raw.into_strings(), vec!["[broken".to_string()]);

        let raw: RawList = serde_json::from_value(json!(null)).unwrap();
        assert!(raw.into_strings().is_empty());
    }

    #[test]
    fn test_required_experience_parsing() {
        let with = |value: Value| {
            normalize_role(RawRole {
                required_experience: Some(value),
                ..Default::default()
            })
            .required_experience_years
        };
        assert_eq!(with(json!(7)), 7);
        assert_eq!(with(json!("5+ years")), 5);
        assert_eq!(with(json!("no minimum")), 0);
        assert_eq!(with(json!(-3)), 0);
        let absent = normalize_role(RawRole::default());
        assert_eq!(absent.required_experience_years, 0);
    }

    #[test]
    fn test_role_display_defaults() {
        let role = normalize_role(RawRole::default());
        assert_eq!(role.title, "Untitled Position");
        assert_eq!(role.company, "Unknown Company");
        assert!(role.required_skills.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_candidate(RawCandidate {
            name: Some(" Jane Doe ".into()),
            email: Some("jane@example.com".into()),
            external_id: Some("7".into()),
            skills: RawList::Text("Rust, Go".into()),
            ..Default::default()
        });
        let second = normalize_candidate(reraw(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_completion_response_keys_decode() {
        let raw: RawCandidate = serde_json::from_str(
            r#"{
                "Name": "Jane Doe",
                "Email": "jane@example.com",
                "Candidate_ID": "C042",
                "Skills": ["Rust", "SQL"],
                "Experience": "Senior Engineer at Initech (2019-2023)",
                "Education": []
            }"#,
        )
        .unwrap();
        let record = normalize_candidate(raw);
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.external_id, "C042");
        assert_eq!(record.skills, vec!["Rust".to_string(), "SQL".to_string()]);
        assert_eq!(record.experience.len(), 1);
    }
}
