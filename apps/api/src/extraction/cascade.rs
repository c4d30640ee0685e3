//! Strategy-list cascades.
//!
//! Every field extractor is an ordered list of pure `&str -> Option<T>`
//! strategies, tried most-specific first. A strategy returns `None` when it
//! finds nothing usable; the cascade yields the first hit. All strategies
//! failing is not an error — callers fall back to the field's empty value.

use std::collections::HashSet;

use crate::extraction::patterns::BULLET_ITEM;

pub type Strategy<T> = fn(&str) -> Option<T>;

/// Runs `strategies` against `text` in order and returns the first result.
pub fn run_cascade<T>(text: &str, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(text))
}

// ── List-shaping helpers shared by the field strategies ──────────────────────

/// Non-empty trimmed lines of a section body.
pub fn nonempty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bulleted items (`-`, `*`, `•`) anywhere in `text`, markers stripped.
pub fn bullet_items(text: &str) -> Vec<String> {
    BULLET_ITEM
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Splits every line on commas, provided the body contains a comma at all;
/// returns `None` otherwise so the cascade moves on.
pub fn comma_separated(text: &str) -> Option<Vec<String>> {
    if !text.contains(',') {
        return None;
    }
    let items: Vec<String> = text
        .lines()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Drops one run of leading bullet markers with their padding, if present.
pub fn strip_bullet(line: &str) -> &str {
    line.trim_start()
        .trim_start_matches(['-', '*', '\u{2022}'])
        .trim_start()
}

/// `Skill - description` lines reduced to the part before the dash.
pub fn dash_pair_heads(text: &str) -> Option<Vec<String>> {
    let heads: Vec<String> = text
        .lines()
        .filter_map(|line| strip_bullet(line).split_once(" - "))
        .map(|(head, _)| head.trim().to_string())
        .filter(|head| !head.is_empty())
        .collect();
    (!heads.is_empty()).then_some(heads)
}

/// `Item - description` lines kept whole, bullet markers removed.
pub fn dash_pair_lines(text: &str) -> Option<Vec<String>> {
    let lines: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|line| line.contains(" - "))
        .map(str::to_string)
        .collect();
    (!lines.is_empty()).then_some(lines)
}

// Strategy-shaped forms of the helpers above, usable directly in cascades.

pub fn bulleted(text: &str) -> Option<Vec<String>> {
    let items = bullet_items(text);
    (!items.is_empty()).then_some(items)
}

pub fn raw_lines(text: &str) -> Option<Vec<String>> {
    let lines = nonempty_lines(text);
    (!lines.is_empty()).then_some(lines)
}

/// Terminal fallback: the whole trimmed body as a single entry.
pub fn whole_section(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| vec![trimmed.to_string()])
}

/// Post-cascade skill cleanup: drop fragments shorter than three characters
/// and echoes of the section header itself, then deduplicate
/// case-insensitively keeping the first spelling seen.
pub fn dedupe_skills(items: Vec<String>, header_word: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| item.chars().count() >= 3)
        .filter(|item| !item.eq_ignore_ascii_case(header_word))
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
