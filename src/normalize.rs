use std::sync::LazyLock;

use regex::Regex;

// e.g. 02-JAN-2026, 07-OCT-19
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}-[A-Z]{3}-\d{2,4}$").expect("valid date pattern"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid separator pattern"));
static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("valid charset pattern"));
static UNDERSCORES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore pattern"));

/// Trim surrounding whitespace from a raw cell.
pub fn clean(s: &str) -> &str {
    s.trim()
}

/// Trim and uppercase a raw cell, the form city tokens are matched in.
pub fn norm_token(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Convert free text into a lowercase, underscore-delimited key.
///
/// The result only contains `[a-z0-9_]`, never starts or ends with an
/// underscore and never contains two in a row. An empty result means the
/// input carries no usable key.
pub fn slug(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('&', " and ");
    let joined = SEPARATOR_RE.replace_all(&lowered, "_");
    let stripped = DISALLOWED_RE.replace_all(&joined, "");
    let collapsed = UNDERSCORES_RE.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

/// Decide whether a cell plausibly holds a place name.
///
/// Rejects blanks, misplaced dates, tokens without any letter and
/// single-character codes.
pub fn looks_like_city(token: &str) -> bool {
    let t = clean(token);
    if t.is_empty() {
        return false;
    }
    if DATE_RE.is_match(t) {
        return false;
    }
    if !t.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    t.chars().count() > 1
}
