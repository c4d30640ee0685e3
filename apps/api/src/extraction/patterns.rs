// Compiled-once regexes shared by the candidate and role extractors.
// Label patterns stay on a single line: `[^\S\n]` is horizontal whitespace,
// so a bare `Label:` with the value on the next line does not match.

use once_cell::sync::Lazy;
use regex::Regex;

/// `Name: Jane Doe` with the value on the same line.
pub static NAME_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bName[^\S\n]*:[^\S\n]*([^\n]+)").unwrap());

/// `Email: jane@example.com` (also accepts `E-mail:`).
pub static EMAIL_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bE-?mail[^\S\n]*:[^\S\n]*([\w.+-]+@[\w.-]+)").unwrap());

/// Any address-shaped token, for documents that never label the email.
pub static EMAIL_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// `Phone: +1 (555) 010-0199` and the usual label variants.
pub static PHONE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Phone|Tel|Mobile|Contact)[^\S\n]*:[^\S\n]*([0-9()+.\- ]{7,})").unwrap()
});

/// Unlabeled phone-shaped run. Callers must still count digits: year ranges
/// like `2018-2023` match the character class but carry too few digits.
pub static PHONE_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[0-9()+.\- ]{5,}\d").unwrap());

/// `Candidate ID: C042`, `ID# 17`, or a `Candidate:` line holding a token.
pub static ID_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[^\S\n]*(?:Candidate[^\S\n]*ID|Candidate|ID)[^\S\n]*[:#][^\S\n]*([A-Za-z0-9_-]+)")
        .unwrap()
});

/// Parenthesized form, usually appended to the name line: `Jane Doe (ID: C042)`.
pub static ID_PARENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*ID\s*:?\s*([A-Za-z0-9_-]+)\s*\)").unwrap());

/// `2018-2023`, `2019 - present`. Group 1 is the start year, group 2 the end.
pub static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*[-\u{2013}\u{2014}]\s*((?:19|20)\d{2}|present|current)\b")
        .unwrap()
});

/// A lone plausible calendar year.
pub static YEAR_ANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// `7 years`, `10+ yrs`. Group 1 is the count.
pub static YEARS_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").unwrap());

/// One bulleted line; group 1 is the content after the marker.
pub static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[^\S\n]*[-*\u{2022}][^\S\n]*(\S[^\n]*)$").unwrap());

/// Experience heading of the form `Senior Engineer at Initech (2019-2023)`,
/// with or without a leading bullet marker.
pub static TITLE_AT_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[^\S\n]*(?:[-*\u{2022}][^\S\n]*)?(\S[^\n]*?\bat\b[^\n]*?\((?:19|20)\d{2}\s*[-\u{2013}]\s*(?:(?:19|20)\d{2}|present|current)\))",
    )
    .unwrap()
});

/// Degree keywords, used to spot an education line anywhere in the document.
pub static DEGREE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Ph\.?\s?D|Doctorate|Master(?:'s)?|M\.?Sc|MBA|M\.?Eng|Bachelor(?:'s)?|B\.?Sc|B\.?Tech|B\.?Eng|Associate|Diploma|High\s+School)\b",
    )
    .unwrap()
});

/// `Job Title: ...` / `Position: ...` / `Role: ...` on one line.
pub static TITLE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Job[^\S\n]*Title|Title|Position|Role)[^\S\n]*:[^\S\n]*([^\n]+)").unwrap()
});

/// `Company: ...` / `Employer: ...` / `Organization: ...` on one line.
pub static COMPANY_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Company|Employer|Organi[sz]ation)[^\S\n]*:[^\S\n]*([^\n]+)").unwrap()
});

/// Labeled identity or contact line at the top of a document.
pub static IDENTITY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:name|e-?mail|phone|tel|mobile|contact|candidate(?:\s*id)?|id)\b[^\S\n]*[:#]")
        .unwrap()
});

/// First capture group of `regex` in `text`, trimmed, empty filtered out.
pub fn first_capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_patterns_stay_on_one_line() {
        assert!(NAME_LABELED.captures("Name:\nJane Doe").is_none());
        let caps = NAME_LABELED.captures("Name: Jane Doe\nEmail: j@x.io").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "Jane Doe");
    }

    #[test]
    fn test_email_patterns() {
        let caps = EMAIL_LABELED.captures("E-Mail: jane.doe+cv@mail.example.org").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "jane.doe+cv@mail.example.org");
        let bare = EMAIL_BARE.find("reach me at jane@example.com today").unwrap();
        assert_eq!(bare.as_str(), "jane@example.com");
        assert!(EMAIL_BARE.find("not an @ address").is_none());
    }

    #[test]
    fn test_phone_bare_matches_year_range_shape() {
        // The class alone cannot tell a phone from a date span; the extractor
        // rejects matches with fewer than nine digits.
        assert!(PHONE_BARE.find("2018-2023").is_some());
        assert_eq!(
            PHONE_BARE.find("call +1 (555) 010-0199 now").unwrap().as_str(),
            "+1 (555) 010-0199"
        );
    }

    #[test]
    fn test_id_forms() {
        let caps = ID_LABELED.captures("Candidate ID: C042\nName: Jane").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "C042");
        let caps = ID_PARENS.captures("Jane Doe (ID: 17)").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "17");
    }

    #[test]
    fn test_year_range_and_mentions() {
        let caps = YEAR_RANGE.captures("Acme (2018 - present)").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "2018");
        assert_eq!(caps.get(2).unwrap().as_str(), "present");
        let caps = YEARS_MENTION.captures("requires 7+ years of Rust").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "7");
    }

    #[test]
    fn test_bullets_and_experience_headings() {
        let text = "Experience\n- Senior Engineer at Initech (2019-2023)\n• Shipped things\n";
        let items: Vec<&str> = BULLET_ITEM
            .captures_iter(text)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(items, vec!["Senior Engineer at Initech (2019-2023)", "Shipped things"]);
        let caps = TITLE_AT_COMPANY.captures(text).unwrap();
        assert_eq!(
            caps.get(1).unwrap().as_str(),
            "Senior Engineer at Initech (2019-2023)"
        );
    }

    #[test]
    fn test_degree_keyword_spots_variants() {
        for line in [
            "MSc Computer Science, ETH Zurich",
            "Bachelor's degree in History",
            "High School Diploma",
            "PhD in progress",
        ] {
            assert!(DEGREE_KEYWORD.is_match(line), "missed: {line}");
        }
        assert!(!DEGREE_KEYWORD.is_match("massive scale experience"));
    }
}
