//! Role-document (job description) extraction.
//!
//! Same shape as the candidate pipeline: regex cascades over segmented
//! sections, a validity gate, an optional completion-model fallback, and
//! unconditional acceptance of the degraded result as the last resort.

use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::cascade::{
    bulleted, comma_separated, dedupe_skills, raw_lines, run_cascade, strip_bullet,
};
use crate::extraction::patterns::{
    first_capture, COMPANY_LABELED, DEGREE_KEYWORD, TITLE_LABELED, YEARS_MENTION,
};
use crate::extraction::segmenter::{is_section_header, segment, ROLE_SECTIONS};
use crate::llm_client::prompts::{JD_EXTRACT_PROMPT_TEMPLATE, JD_EXTRACT_SYSTEM};
use crate::llm_client::OllamaClient;
use crate::models::role::RoleRequirement;
use crate::normalize::{normalize_role, RawList, RawRole, UNTITLED_POSITION};
use crate::taxonomy::{offer_skills, SkillRegistry};

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full role extraction pipeline.
///
/// Steps:
/// 1. Direct regex cascades over segmented sections
/// 2. Validity gate (a named position plus one required skill)
/// 3. Text-completion fallback when the gate fails and a client is configured
/// 4. Degraded acceptance of the cascade result when everything fails
pub async fn extract_role(
    text: &str,
    llm: Option<&OllamaClient>,
    registry: &dyn SkillRegistry,
) -> RoleRequirement {
    // Step 1: direct cascade
    let direct = normalize_role(extract_direct(text));

    // Step 2: validity gate
    let role = if passes_gate(&direct) {
        direct
    } else if let Some(client) = llm {
        // Step 3: completion fallback
        info!("Direct role extraction failed the validity gate, asking completion model");
        match client
            .call_json::<RawRole>(
                &JD_EXTRACT_PROMPT_TEMPLATE.replace("{jd_text}", text),
                JD_EXTRACT_SYSTEM,
            )
            .await
        {
            Ok(raw) => {
                let recovered = normalize_role(raw);
                if passes_gate(&recovered) {
                    recovered
                } else {
                    warn!("Completion extraction also failed the gate, keeping cascade result");
                    direct
                }
            }
            Err(e) => {
                warn!("Completion extraction failed: {e}, keeping cascade result");
                direct
            }
        }
    } else {
        // Step 4: no collaborator configured, accept the degraded result
        warn!("Role extraction degraded: no completion model configured");
        direct
    };

    offer_skills(registry, &role.required_skills).await;
    offer_skills(registry, &role.preferred_skills).await;

    info!(
        "Extracted role '{}' with {} required and {} preferred skills",
        role.title,
        role.required_skills.len(),
        role.preferred_skills.len()
    );
    role
}

/// Gate for the direct pass: the position is actually named (not the display
/// default) and at least one required skill was found.
pub fn passes_gate(role: &RoleRequirement) -> bool {
    role.title != UNTITLED_POSITION && !role.required_skills.is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Direct cascade
// ────────────────────────────────────────────────────────────────────────────

/// Runs every per-field cascade without consulting any collaborator.
pub fn extract_direct(text: &str) -> RawRole {
    let sections = segment(text, ROLE_SECTIONS);
    let section = |name: &str| sections.get(name).map(String::as_str).unwrap_or("");

    let requirements = section("Requirements");
    RawRole {
        title: first_capture(&TITLE_LABELED, text).or_else(|| title_first_line(text)),
        company: first_capture(&COMPANY_LABELED, text),
        required_skills: RawList::from_strings(extract_skill_list(requirements, "Requirements")),
        preferred_skills: RawList::from_strings(extract_skill_list(
            section("Preferred"),
            "Preferred",
        )),
        required_experience: required_years(text, requirements).map(Value::from),
        required_education: education_line(text, section("Education")),
        responsibilities: RawList::from_strings(
            run_cascade(section("Responsibilities"), &[bulleted, raw_lines]).unwrap_or_default(),
        ),
    }
}

/// Title fallback: the first non-empty line that is neither a section
/// header nor a company label.
fn title_first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && !is_section_header(line, ROLE_SECTIONS)
                && !COMPANY_LABELED.is_match(line)
        })
        .map(str::to_string)
}

fn extract_skill_list(body: &str, header: &str) -> Vec<String> {
    let items = run_cascade(body, &[bulleted, comma_separated, raw_lines]).unwrap_or_default();
    dedupe_skills(items, header)
}

/// First `<N>+ years` mention in the requirements section, then anywhere.
fn required_years(text: &str, requirements: &str) -> Option<u32> {
    first_capture(&YEARS_MENTION, requirements)
        .or_else(|| first_capture(&YEARS_MENTION, text))
        .and_then(|digits| digits.parse().ok())
}

/// First education-section line naming a degree, then the first
/// degree-naming sentence anywhere in the document.
fn education_line(text: &str, education_body: &str) -> Option<String> {
    education_body
        .lines()
        .map(strip_bullet)
        .find(|line| DEGREE_KEYWORD.is_match(line))
        .map(|line| line.trim().to_string())
        .or_else(|| degree_sentence(text))
}

fn degree_sentence(text: &str) -> Option<String> {
    text.lines()
        .flat_map(|line| line.split(". "))
        .map(|sentence| sentence.trim().trim_end_matches('.'))
        .find(|sentence| DEGREE_KEYWORD.is_match(sentence))
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::NoopSkillRegistry;

    const LABELED_JD: &str = r#"Job Title: Senior Data Engineer
Company: Initech

Requirements:
- 5+ years of Python development
- SQL
- Airflow

Preferred Skills:
- Docker
- Terraform

Responsibilities:
- Own the nightly batch pipelines
- Mentor junior engineers

Education:
Bachelor's degree in Computer Science or related field
"#;

    const PLAIN_JD: &str =
        "Backend Engineer (Platform)\nInitech builds internal tooling.\nRequirements:\nPython, Kubernetes\n";

    const BARE_JD: &str =
        "Data Analyst\nWe want someone with 7 years building dashboards and an MSc in Statistics.\n";

    #[test]
    fn test_labeled_jd_extracts_every_field() {
        let role = normalize_role(extract_direct(LABELED_JD));
        assert_eq!(role.title, "Senior Data Engineer");
        assert_eq!(role.company, "Initech");
        assert_eq!(
            role.required_skills,
            vec!["5+ years of Python development", "SQL", "Airflow"]
        );
        assert_eq!(role.preferred_skills, vec!["Docker", "Terraform"]);
        assert_eq!(role.required_experience_years, 5);
        assert_eq!(
            role.required_education_level,
            "Bachelor's degree in Computer Science or related field"
        );
        assert_eq!(role.responsibilities.len(), 2);
        assert!(passes_gate(&role));
    }

    #[test]
    fn test_title_falls_back_to_first_plain_line() {
        let role = normalize_role(extract_direct(PLAIN_JD));
        assert_eq!(role.title, "Backend Engineer (Platform)");
        assert_eq!(role.company, "Unknown Company");
        assert_eq!(role.required_skills, vec!["Python", "Kubernetes"]);
        assert!(passes_gate(&role));
    }

    #[test]
    fn test_years_and_degree_found_without_sections() {
        let role = normalize_role(extract_direct(BARE_JD));
        assert_eq!(role.title, "Data Analyst");
        assert_eq!(role.required_experience_years, 7);
        assert!(role.required_education_level.contains("MSc"));
        assert!(role.required_skills.is_empty());
        assert!(!passes_gate(&role));
    }

    #[tokio::test]
    async fn test_pipeline_defaults_an_empty_document() {
        let role = extract_role("", None, &NoopSkillRegistry).await;
        assert_eq!(role.title, "Untitled Position");
        assert_eq!(role.company, "Unknown Company");
        assert_eq!(role.required_experience_years, 0);
        assert!(role.required_skills.is_empty());
    }
}
