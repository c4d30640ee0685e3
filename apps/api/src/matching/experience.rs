//! Experience-years extraction and scoring.

use chrono::{Datelike, Utc};
use regex::Captures;

use crate::extraction::patterns::{YEARS_MENTION, YEAR_RANGE};

/// Tenure claims beyond this are treated as noise rather than a career.
const MAX_PLAUSIBLE_YEARS: u32 = 50;

/// Total years across free-text entries.
///
/// Per entry, the larger of (a) the biggest explicit "N years" mention and
/// (b) the biggest plausible date-range span, with "present"/"current"
/// resolved to the current calendar year. The overall value is the maximum
/// across entries, clamped to [0, 50]. Adding an entry can therefore only
/// raise or preserve the total.
pub fn extract_years(entries: &[String]) -> u32 {
    entries
        .iter()
        .map(|entry| entry_years(entry))
        .max()
        .unwrap_or(0)
        .min(MAX_PLAUSIBLE_YEARS)
}

fn entry_years(entry: &str) -> u32 {
    let mentioned = YEARS_MENTION
        .captures_iter(entry)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    let spanned = YEAR_RANGE
        .captures_iter(entry)
        .filter_map(|caps| range_span(&caps))
        .max()
        .unwrap_or(0);

    mentioned.max(spanned)
}

fn range_span(caps: &Captures<'_>) -> Option<u32> {
    let start: i32 = caps.get(1)?.as_str().parse().ok()?;
    let end_text = caps.get(2)?.as_str();
    let end: i32 = if end_text.eq_ignore_ascii_case("present")
        || end_text.eq_ignore_ascii_case("current")
    {
        Utc::now().year()
    } else {
        end_text.parse().ok()?
    };

    let span = end - start;
    (0..=MAX_PLAUSIBLE_YEARS as i32)
        .contains(&span)
        .then_some(span as u32)
}

/// `min(1, candidate/required)` when a requirement exists, else full marks.
pub fn experience_score(candidate_years: u32, required_years: u32) -> f64 {
    if required_years == 0 {
        return 1.0;
    }
    (candidate_years as f64 / required_years as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_date_range_span() {
        assert_eq!(extract_years(&entries(&["Engineer at Acme (2018-2023)"])), 5);
    }

    #[test]
    fn test_explicit_mention_beats_shorter_span() {
        let years = extract_years(&entries(&["8 years of Rust, Initech (2020-2022)"]));
        assert_eq!(years, 8);
    }

    #[test]
    fn test_maximum_across_entries_not_sum() {
        let years = extract_years(&entries(&[
            "Engineer at Acme (2018-2023)",
            "Analyst at Hooli (2012-2015)",
        ]));
        assert_eq!(years, 5);
    }

    #[test]
    fn test_present_resolves_to_current_year() {
        let years = extract_years(&entries(&["Lead at Initech (2019-present)"]));
        assert!(years >= 5);
        assert!(years <= MAX_PLAUSIBLE_YEARS);
    }

    #[test]
    fn test_implausible_span_is_ignored() {
        assert_eq!(extract_years(&entries(&["archivist (1930-2020)"])), 0);
    }

    #[test]
    fn test_total_is_clamped() {
        assert_eq!(extract_years(&entries(&["99 years of experience"])), 50);
    }

    #[test]
    fn test_appending_a_mention_never_lowers_the_total() {
        let baselines = [
            entries(&[]),
            entries(&["Engineer at Acme (2018-2023)"]),
            entries(&["3 years consulting", "Intern (2009-2010)"]),
            entries(&["99 years of experience"]),
        ];
        for baseline in baselines {
            let before = extract_years(&baseline);
            let mut extended = baseline.clone();
            extended.push("10 years of additional platform work".to_string());
            assert!(extract_years(&extended) >= before);
        }
    }

    #[test]
    fn test_experience_score() {
        assert_eq!(experience_score(5, 5), 1.0);
        assert_eq!(experience_score(10, 5), 1.0);
        assert_eq!(experience_score(2, 4), 0.5);
        assert_eq!(experience_score(0, 0), 1.0);
        assert_eq!(experience_score(0, 3), 0.0);
    }
}
