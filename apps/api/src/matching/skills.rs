//! Lexical skill matching.
//!
//! The match rule is deliberately forgiving: case-insensitive equality, or
//! either string containing the other, so "Python" matches "5+ years of
//! Python development". Scores and the matched/missing enumeration both
//! come from this one procedure, which keeps justifications reproducible.

/// Outcome of matching one wanted-skill list against a candidate's skills.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillAssessment {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub score: f64,
}

impl SkillAssessment {
    pub fn empty() -> Self {
        Self {
            matched: Vec::new(),
            missing: Vec::new(),
            score: 0.0,
        }
    }
}

/// Case-insensitive equality or either-direction containment.
pub fn skills_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

/// Matches every `wanted` skill against `offered`.
/// `score = matched / max(1, wanted.len())`, so an empty demand scores 0.
pub fn assess(wanted: &[String], offered: &[String]) -> SkillAssessment {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for skill in wanted {
        if offered.iter().any(|have| skills_match(skill, have)) {
            matched.push(skill.clone());
        } else {
            missing.push(skill.clone());
        }
    }
    let score = matched.len() as f64 / wanted.len().max(1) as f64;
    SkillAssessment {
        matched,
        missing,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_rule_is_case_insensitive_and_bidirectional() {
        assert!(skills_match("python", "Python"));
        assert!(skills_match("Python", "5+ years of Python development"));
        assert!(skills_match("PostgreSQL administration", "postgresql"));
        assert!(!skills_match("Java", "Python"));
        assert!(!skills_match("", "Python"));
    }

    #[test]
    fn test_substring_rule_accepts_java_against_javascript() {
        // Containment cuts both ways on purpose.
        assert!(skills_match("Java", "JavaScript"));
    }

    #[test]
    fn test_assessment_scores_matched_over_wanted() {
        let assessment = assess(&list(&["Python", "SQL"]), &list(&["python", "Java"]));
        assert_eq!(assessment.matched, vec!["Python"]);
        assert_eq!(assessment.missing, vec!["SQL"]);
        assert!((assessment.score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_wanted_list_scores_zero_without_dividing_by_zero() {
        let assessment = assess(&[], &list(&["Python"]));
        assert!(assessment.matched.is_empty());
        assert!(assessment.missing.is_empty());
        assert_eq!(assessment.score, 0.0);
    }
}
