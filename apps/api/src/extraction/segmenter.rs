//! Section segmentation — splits raw document text into named sections.
//!
//! Primary path: header-token detection (case-insensitive, synonym
//! alternation per section). Fallback when no token matches anywhere: a
//! line-oriented heuristic that opens a section on short colon-terminated
//! lines and accumulates everything else under the last opened section
//! (or an initial "Description").

use std::collections::HashMap;

use regex::RegexBuilder;

/// One requested section: a canonical name plus the header tokens that open it.
/// Longer aliases come first so overlapping tokens resolve to the full form.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// Sections requested for candidate documents (résumés).
pub const CANDIDATE_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        name: "Summary",
        aliases: &["Summary", "Profile", "About Me"],
    },
    SectionSpec {
        name: "Skills",
        aliases: &["Technical Skills", "Core Competencies", "Skills"],
    },
    SectionSpec {
        name: "Tech Stack",
        aliases: &["Tech Stack", "Technologies"],
    },
    SectionSpec {
        name: "Experience",
        aliases: &[
            "Work Experience",
            "Employment History",
            "Work History",
            "Experience",
        ],
    },
    SectionSpec {
        name: "Education",
        aliases: &["Education", "Academic Background"],
    },
    SectionSpec {
        name: "Certifications",
        aliases: &["Certifications", "Certificates", "Licenses"],
    },
    SectionSpec {
        name: "Languages",
        aliases: &["Languages"],
    },
];

/// Sections requested for role documents (job descriptions).
pub const ROLE_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        name: "Requirements",
        aliases: &["Required Skills", "Requirements", "Must Have", "Qualifications"],
    },
    SectionSpec {
        name: "Preferred",
        aliases: &["Preferred Skills", "Nice to Have", "Preferred", "Bonus"],
    },
    SectionSpec {
        name: "Responsibilities",
        aliases: &["Responsibilities", "Duties", "What You'll Do"],
    },
    SectionSpec {
        name: "Education",
        aliases: &["Education"],
    },
];

/// Maximum length of a line the heuristic will treat as an implicit header.
const IMPLICIT_HEADER_MAX_CHARS: usize = 30;

/// Splits `text` into the requested sections.
///
/// Every requested section name is present in the result, mapped to an empty
/// string when its header never appears. In heuristic mode the result also
/// carries a "Description" section and any implicit headers that match no
/// requested name.
pub fn segment(text: &str, specs: &[SectionSpec]) -> HashMap<String, String> {
    let mut sections: HashMap<String, String> = specs
        .iter()
        .map(|spec| (spec.name.to_string(), String::new()))
        .collect();

    struct HeaderHit {
        start: usize,
        body_start: usize,
        name: &'static str,
    }

    let mut hits: Vec<HeaderHit> = Vec::new();
    for spec in specs {
        if let Some(m) = header_regex(spec).find(text) {
            hits.push(HeaderHit {
                start: m.start(),
                body_start: m.end(),
                name: spec.name,
            });
        }
    }

    if hits.is_empty() {
        return segment_heuristic(text, sections);
    }

    hits.sort_by_key(|hit| hit.start);

    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(text.len(), |next| next.start);
        let body = text[hit.body_start..end].trim();
        sections.insert(hit.name.to_string(), body.to_string());
    }

    sections
}

/// Builds the header matcher for one section: line start, any alias, an
/// optional trailing colon. Body text begins immediately after the match.
fn header_regex(spec: &SectionSpec) -> regex::Regex {
    let alternation = spec
        .aliases
        .iter()
        .map(|alias| regex::escape(alias))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"^[^\S\n]*(?:{alternation})\b[^\S\n]*:?"))
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .expect("section header alternation must compile")
}

fn segment_heuristic(
    text: &str,
    mut sections: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut current = "Description".to_string();
    sections.entry(current.clone()).or_default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_implicit_header(trimmed) {
            current = trimmed.trim_end_matches(':').trim().to_string();
            sections.entry(current.clone()).or_default();
        } else {
            let body = sections.entry(current.clone()).or_default();
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(trimmed);
        }
    }

    sections
}

/// A line opens an implicit section when it is short, colon-terminated,
/// and starts with an uppercase letter.
fn is_implicit_header(line: &str) -> bool {
    line.chars().count() < IMPLICIT_HEADER_MAX_CHARS
        && line.ends_with(':')
        && line.chars().next().is_some_and(|c| c.is_uppercase())
}

/// True when `line` reads as a section header, either one of the requested
/// aliases (with or without a colon) or an implicit header.
pub fn is_section_header(line: &str, specs: &[SectionSpec]) -> bool {
    let bare = line.trim().trim_end_matches(':').trim_end();
    specs
        .iter()
        .any(|spec| spec.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(bare)))
        || is_implicit_header(line.trim())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
