//! Education-level ordinals and scoring.

/// Recognized levels, lowest to highest. Detection is case-insensitive
/// keyword containment, so "Bachelor of Science" and "bachelor's degree"
/// both land on the same ordinal.
const LEVELS: &[(&str, u32)] = &[
    ("high school", 1),
    ("diploma", 2),
    ("associate", 3),
    ("bachelor", 4),
    ("master", 5),
    ("phd", 6),
    ("doctorate", 6),
];

/// Highest level named anywhere in the candidate's education entries.
pub fn candidate_ordinal(entries: &[String]) -> Option<u32> {
    entries.iter().filter_map(|entry| highest_level(entry)).max()
}

/// First level keyword by position in the role's requirement string. A
/// requirement reading "Master's or Bachelor's" therefore demands a
/// master's.
pub fn required_ordinal(requirement: &str) -> Option<u32> {
    let requirement = requirement.to_lowercase();
    LEVELS
        .iter()
        .copied()
        .filter_map(|(keyword, ordinal)| {
            requirement.find(keyword).map(|position| (position, ordinal))
        })
        .min_by_key(|(position, _)| *position)
        .map(|(_, ordinal)| ordinal)
}

fn highest_level(text: &str) -> Option<u32> {
    let text = text.to_lowercase();
    LEVELS
        .iter()
        .copied()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, ordinal)| ordinal)
        .max()
}

/// Full marks when the role names no recognized level or the candidate
/// meets it; otherwise partial credit `candidate/required`. Never negative,
/// never above 1.
pub fn education_score(candidate: Option<u32>, required: Option<u32>) -> f64 {
    match required {
        None => 1.0,
        Some(required) => {
            let candidate = candidate.unwrap_or(0);
            if candidate >= required {
                1.0
            } else {
                candidate as f64 / required as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_candidate_takes_highest_level() {
        let ordinal = candidate_ordinal(&entries(&[
            "High School Diploma, 2008",
            "Bachelor of Science in CS (2010-2014)",
        ]));
        assert_eq!(ordinal, Some(4));
    }

    #[test]
    fn test_role_takes_first_level_by_position() {
        assert_eq!(required_ordinal("Master's or Bachelor's degree"), Some(5));
        assert_eq!(required_ordinal("Bachelor's degree"), Some(4));
        assert_eq!(required_ordinal("any background welcome"), None);
    }

    #[test]
    fn test_diploma_against_bachelor_scores_half() {
        let candidate = candidate_ordinal(&entries(&["Diploma in IT, 2015"]));
        let required = required_ordinal("Bachelor's degree");
        assert_eq!(candidate, Some(2));
        assert_eq!(required, Some(4));
        assert_eq!(education_score(candidate, required), 0.5);
    }

    #[test]
    fn test_meeting_or_exceeding_requirement_scores_full() {
        assert_eq!(education_score(Some(6), Some(4)), 1.0);
        assert_eq!(education_score(Some(4), Some(4)), 1.0);
    }

    #[test]
    fn test_unstated_requirement_scores_full() {
        assert_eq!(education_score(None, None), 1.0);
        assert_eq!(education_score(Some(2), None), 1.0);
    }

    #[test]
    fn test_missing_candidate_education_scores_zero_against_requirement() {
        assert_eq!(education_score(None, Some(4)), 0.0);
    }
}
