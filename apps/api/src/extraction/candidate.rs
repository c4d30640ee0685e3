//! Candidate-document extraction.
//!
//! Flow: segment → per-field regex cascades → validity gate → optional
//! text-completion fallback → degraded-acceptance → normalize. The pipeline
//! always yields a schema-valid record; a document nothing could be read
//! from comes back maximally empty, never as an error.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::extraction::cascade::{
    bulleted, comma_separated, dash_pair_heads, dash_pair_lines, dedupe_skills, raw_lines,
    run_cascade, strip_bullet, whole_section,
};
use crate::extraction::patterns::{
    first_capture, DEGREE_KEYWORD, EMAIL_BARE, EMAIL_LABELED, IDENTITY_LINE, ID_LABELED,
    ID_PARENS, NAME_LABELED, PHONE_BARE, PHONE_LABELED, TITLE_AT_COMPANY, YEAR_ANY, YEAR_RANGE,
};
use crate::extraction::segmenter::{is_section_header, segment, CANDIDATE_SECTIONS};
use crate::llm_client::prompts::{CV_EXTRACT_PROMPT_TEMPLATE, CV_EXTRACT_SYSTEM};
use crate::llm_client::OllamaClient;
use crate::models::candidate::CandidateRecord;
use crate::normalize::{normalize_candidate, RawCandidate, RawList};
use crate::taxonomy::{offer_skills, SkillRegistry};

/// A paragraph opener needs at least this many words to read as prose
/// rather than a name or contact line.
const MIN_SUMMARY_WORDS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full candidate extraction pipeline.
///
/// Steps:
/// 1. Direct regex cascades over segmented sections
/// 2. Validity gate (non-empty name plus one substantive field)
/// 3. Text-completion fallback when the gate fails and a client is configured,
///    decoded through the same normalizer as cascade output
/// 4. Degraded acceptance: when everything fails, the cascade result is kept
///    as-is, sparse fields and all
pub async fn extract_candidate(
    text: &str,
    llm: Option<&OllamaClient>,
    registry: &dyn SkillRegistry,
) -> CandidateRecord {
    // Step 1: direct cascade
    let direct = normalize_candidate(extract_direct(text));

    // Step 2: validity gate
    let record = if passes_gate(&direct) {
        direct
    } else if let Some(client) = llm {
        // Step 3: completion fallback
        info!("Direct candidate extraction failed the validity gate, asking completion model");
        match client
            .call_json::<RawCandidate>(
                &CV_EXTRACT_PROMPT_TEMPLATE.replace("{cv_text}", text),
                CV_EXTRACT_SYSTEM,
            )
            .await
        {
            Ok(raw) => {
                let recovered = normalize_candidate(raw);
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
        warn!("Candidate extraction degraded: no completion model configured");
        direct
    };

    // Side effect: newly seen skills feed the taxonomy, best effort only.
    offer_skills(registry, &record.skills).await;

    info!(
        "Extracted candidate {} with {} skills, {} experience entries",
        record.external_id,
        record.skills.len(),
        record.experience.len()
    );
    record
}

/// A direct extraction is trusted only when it names the person and carries
/// at least one substantive field; anything weaker escalates.
pub fn passes_gate(record: &CandidateRecord) -> bool {
    !record.name.is_empty()
        && (!record.email.is_empty()
            || !record.phone.is_empty()
            || !record.skills.is_empty()
            || !record.experience.is_empty()
            || !record.education.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Direct cascade
// ────────────────────────────────────────────────────────────────────────────

/// Runs every per-field cascade without consulting any collaborator and
/// returns the loosely-typed field map.
pub fn extract_direct(text: &str) -> RawCandidate {
    let sections = segment(text, CANDIDATE_SECTIONS);
    let section = |name: &str| sections.get(name).map(String::as_str).unwrap_or("");

    let name = first_capture(&NAME_LABELED, text);
    let email = run_cascade(text, &[email_labeled, email_scan]);
    let phone = run_cascade(text, &[phone_labeled, phone_scan]);
    let external_id = run_cascade(text, &[id_labeled, id_parens])
        .or_else(|| synthesize_external_id(name.as_deref(), email.as_deref()));

    RawCandidate {
        name,
        email,
        phone,
        external_id,
        summary: extract_summary(text, &sections),
        skills: RawList::from_strings(extract_skills(&sections)),
        experience: RawList::from_strings(extract_experience(section("Experience"))),
        education: RawList::from_strings(extract_education(section("Education"))),
        certifications: RawList::from_strings(extract_certifications(section("Certifications"))),
        languages: RawList::from_strings(extract_languages(section("Languages"))),
    }
}

fn email_labeled(text: &str) -> Option<String> {
    first_capture(&EMAIL_LABELED, text)
}

fn email_scan(text: &str) -> Option<String> {
    EMAIL_BARE.find(text).map(|m| m.as_str().to_string())
}

fn phone_labeled(text: &str) -> Option<String> {
    first_capture(&PHONE_LABELED, text)
}

/// Unlabeled scan. Only a run with a phone-plausible digit count qualifies,
/// which keeps date ranges like `2018-2023` out.
fn phone_scan(text: &str) -> Option<String> {
    PHONE_BARE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            (9..=15).contains(&digits)
        })
}

fn id_labeled(text: &str) -> Option<String> {
    first_capture(&ID_LABELED, text)
}

fn id_parens(text: &str) -> Option<String> {
    first_capture(&ID_PARENS, text)
}

/// Last identifier resort before the normalizer mints one: first name token
/// glued to the first three characters of the email.
fn synthesize_external_id(name: Option<&str>, email: Option<&str>) -> Option<String> {
    let token = name?.split_whitespace().next()?;
    let prefix: String = email?.chars().take(3).collect();
    (!prefix.is_empty()).then(|| format!("{token}{prefix}"))
}

fn extract_skills(sections: &HashMap<String, String>) -> Vec<String> {
    let body = sections.get("Skills").map(String::as_str).unwrap_or("");
    let mut skills =
        run_cascade(body, &[bulleted, comma_separated, dash_pair_heads, raw_lines])
            .unwrap_or_default();

    // A Tech Stack section is merged in, split on commas and whitespace both.
    if let Some(stack) = sections.get("Tech Stack") {
        skills.extend(
            stack
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        );
    }

    dedupe_skills(skills, "Skills")
}

fn extract_experience(body: &str) -> Vec<String> {
    run_cascade(body, &[title_at_company_entries, year_line_entries, whole_section])
        .unwrap_or_default()
}

fn title_at_company_entries(text: &str) -> Option<Vec<String>> {
    let entries: Vec<String> = TITLE_AT_COMPANY
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();
    (!entries.is_empty()).then_some(entries)
}

/// Lines carrying a year range, each merged with the following line when
/// that line reads as a plain description.
fn year_line_entries(text: &str) -> Option<Vec<String>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut entries = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        if YEAR_RANGE.is_match(line) {
            let mut entry = strip_bullet(line).to_string();
            if let Some(next) = lines.get(index + 1) {
                if !YEAR_RANGE.is_match(next) {
                    entry.push(' ');
                    entry.push_str(strip_bullet(next));
                    index += 1;
                }
            }
            entries.push(entry);
        }
        index += 1;
    }
    (!entries.is_empty()).then_some(entries)
}

fn extract_education(body: &str) -> Vec<String> {
    run_cascade(body, &[degree_year_entries, anchored_entry_groups, whole_section])
        .unwrap_or_default()
}

/// `Degree ... (YYYY-YYYY)` lines.
fn degree_year_entries(text: &str) -> Option<Vec<String>> {
    let entries: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|line| DEGREE_KEYWORD.is_match(line) && YEAR_RANGE.is_match(line))
        .map(str::to_string)
        .collect();
    (!entries.is_empty()).then_some(entries)
}

/// Groups lines into entries, opening a new entry at each line that carries
/// a year or a degree keyword; continuation lines are appended.
fn anchored_entry_groups(text: &str) -> Option<Vec<String>> {
    let mut groups: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let line = strip_bullet(line);
        if YEAR_ANY.is_match(line) || DEGREE_KEYWORD.is_match(line) {
            groups.push(line.to_string());
        } else if let Some(current) = groups.last_mut() {
            current.push(' ');
            current.push_str(line);
        }
    }
    (!groups.is_empty()).then_some(groups)
}

fn extract_certifications(body: &str) -> Vec<String> {
    run_cascade(body, &[dash_pair_lines, raw_lines]).unwrap_or_default()
}

fn extract_languages(body: &str) -> Vec<String> {
    run_cascade(body, &[comma_separated, raw_lines]).unwrap_or_default()
}

fn extract_summary(text: &str, sections: &HashMap<String, String>) -> Option<String> {
    if let Some(body) = sections.get("Summary").filter(|body| !body.trim().is_empty()) {
        return Some(body.trim().to_string());
    }
    first_paragraph_after_identity(text)
}

/// Fallback summary: the first prose paragraph above any section header,
/// skipping name and contact lines.
fn first_paragraph_after_identity(text: &str) -> Option<String> {
    let mut collected: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if is_section_header(line, CANDIDATE_SECTIONS) {
            break;
        }
        if collected.is_empty() {
            if line.is_empty() || looks_like_contact(line) {
                continue;
            }
            collected.push(line);
        } else if line.is_empty() || IDENTITY_LINE.is_match(line) {
            break;
        } else {
            collected.push(line);
        }
    }
    (!collected.is_empty()).then(|| collected.join(" "))
}

fn looks_like_contact(line: &str) -> bool {
    IDENTITY_LINE.is_match(line)
        || EMAIL_BARE.is_match(line)
        || line.split_whitespace().count() < MIN_SUMMARY_WORDS
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::NoopSkillRegistry;

    const LABELED_CV: &str = r#"Name: Priya Sharma
Email: priya.sharma@example.com
Phone: +1 (555) 010-0199
Candidate ID: C1042

Summary:
Backend engineer focused on data-heavy services.

Skills:
- Python
- SQL
- Docker

Experience:
Senior Engineer at Initech (2018-2023)
Built reporting pipelines.

Education:
Bachelor of Science in Computer Science (2010-2014)

Languages:
English, Hindi
"#;

    const UNIDENTIFIED_CV: &str = "Name: Jane Doe\nEmail: jane@example.com\nSkills: Python, SQL\n";

    const PARAGRAPH_CV: &str = "Jane Doe\njane@example.com\n\nSeasoned platform engineer with a decade of distributed systems work.\n\nSkills:\n- Rust\n";

    #[test]
    fn test_labeled_cv_extracts_every_field() {
        let record = normalize_candidate(extract_direct(LABELED_CV));
        assert_eq!(record.name, "Priya Sharma");
        assert_eq!(record.email, "priya.sharma@example.com");
        assert_eq!(record.phone, "+1 (555) 010-0199");
        assert_eq!(record.external_id, "C1042");
        assert_eq!(record.summary, "Backend engineer focused on data-heavy services.");
        assert_eq!(record.skills, vec!["Python", "SQL", "Docker"]);
        assert_eq!(record.experience, vec!["Senior Engineer at Initech (2018-2023)"]);
        assert_eq!(
            record.education,
            vec!["Bachelor of Science in Computer Science (2010-2014)"]
        );
        assert_eq!(record.languages, vec!["English", "Hindi"]);
        assert!(passes_gate(&record));
    }

    #[test]
    fn test_external_id_synthesized_from_name_and_email() {
        let record = normalize_candidate(extract_direct(UNIDENTIFIED_CV));
        assert_eq!(record.external_id, "CJanejan");
        assert_eq!(record.skills, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_summary_falls_back_to_first_paragraph() {
        let record = normalize_candidate(extract_direct(PARAGRAPH_CV));
        assert_eq!(
            record.summary,
            "Seasoned platform engineer with a decade of distributed systems work."
        );
        // No Name: label anywhere, so the direct pass leaves the name empty.
        assert_eq!(record.name, "");
        assert!(!passes_gate(&record));
    }

    #[test]
    fn test_phone_scan_skips_date_ranges() {
        assert_eq!(phone_scan("employed 2018-2023 at Initech"), None);
        assert_eq!(
            phone_scan("reach me on +49 170 555 0123 after six").as_deref(),
            Some("+49 170 555 0123")
        );
    }

    #[test]
    fn test_year_lines_merge_following_description() {
        let body = "Initech, 2018-2023\nLed the reporting team\nHooli, 2015-2018";
        assert_eq!(
            year_line_entries(body).unwrap(),
            vec![
                "Initech, 2018-2023 Led the reporting team".to_string(),
                "Hooli, 2015-2018".to_string()
            ]
        );
    }

    #[test]
    fn test_tech_stack_merges_into_skills() {
        let cv = "Name: A B\nSkills:\n- Python\nTech Stack: Terraform Ansible, PostgreSQL\n";
        let record = normalize_candidate(extract_direct(cv));
        assert_eq!(record.skills, vec!["Python", "Terraform", "Ansible", "PostgreSQL"]);
    }

    #[tokio::test]
    async fn test_pipeline_accepts_degraded_record_without_collaborators() {
        let record =
            extract_candidate("met at a conference, no details yet", None, &NoopSkillRegistry)
                .await;
        assert!(record.name.is_empty());
        assert!(record.external_id.starts_with('C'));
        assert!(record.skills.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_accepts_direct_result_when_gate_passes() {
        let record = extract_candidate(LABELED_CV, None, &NoopSkillRegistry).await;
        assert_eq!(record.external_id, "C1042");
        assert_eq!(record.name, "Priya Sharma");
    }
}
