#![allow(dead_code)]

// All LLM prompt constants for the extraction fallback pass.
// The regex cascades run first; these prompts only fire when a direct
// extraction fails its validity gate.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for CV field extraction — enforces JSON-only output.
pub const CV_EXTRACT_SYSTEM: &str =
    "You are an expert technical recruiter parsing candidate CVs. \
    Extract structured fields from raw CV text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// CV extraction prompt template. Replace `{cv_text}` before sending.
pub const CV_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured fields from the following CV.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "Jane Doe",
  "email": "jane.doe@example.com",
  "phone": "+1 555 0100",
  "external_id": "C1042",
  "summary": "Backend engineer with eight years of distributed-systems work.",
  "skills": ["Python", "SQL", "Docker"],
  "experience": ["Senior Engineer at Acme Corp (2018-2023)"],
  "education": ["Bachelor of Science in Computer Science, MIT (2010-2014)"],
  "certifications": ["AWS Solutions Architect"],
  "languages": ["English", "Spanish"]
}

Rules:
- Use null for any scalar field the CV does not state. NEVER invent values.
- Use [] for any list field the CV does not cover.
- "external_id" only if the CV declares a candidate identifier; do not fabricate one.
- "experience" entries keep the original wording including employer and year range.
- "skills" entries are individual technologies or competencies, one per element,
  never a whole sentence.

CV text:
{cv_text}"#;

/// System prompt for JD field extraction — enforces JSON-only output.
pub const JD_EXTRACT_SYSTEM: &str = "You are an expert job description analyst. \
    Extract structured hiring requirements from raw JD text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// JD extraction prompt template. Replace `{jd_text}` before sending.
pub const JD_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured requirements from the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "Senior Backend Engineer",
  "company": "Acme Corp",
  "required_skills": ["Python", "PostgreSQL"],
  "preferred_skills": ["Kubernetes"],
  "required_experience": 5,
  "required_education": "Bachelor's degree in Computer Science",
  "responsibilities": ["Design and operate backend services"]
}

Rules:
- Use null for any scalar field the JD does not state. NEVER invent values.
- Use [] for any list field the JD does not cover.
- "required_experience" is the minimum years as a number; null when unstated.
- "required_skills" are explicit must-haves; "preferred_skills" are
  nice-to-haves ("preferred", "bonus", "a plus").
- Skill entries are individual technologies or competencies, one per element,
  never a whole sentence.

Job description:
{jd_text}"#;
