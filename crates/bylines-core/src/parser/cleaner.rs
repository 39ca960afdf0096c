//! # Title Cleaner
//!
//! Normalizes a raw extracted title: strips leading whitespace/dash runs and
//! a redundant pair of enclosing double quotes.

fn is_leading_noise(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '\u{2013}' | '\u{2014}')
}

/// Removes one pair of enclosing `"` when the interior holds no other `"`.
fn strip_enclosing_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        let inner = &s[1..s.len() - 1];
        if !inner.contains('"') {
            return inner;
        }
    }
    s
}

/// Cleans a single title string.
///
/// Applied until nothing changes, so `clean_title(&clean_title(s)) == clean_title(s)`
/// holds even for inputs like `"- \"- Title\""`.
///
/// ```
/// use bylines_core::parser::clean_title;
///
/// assert_eq!(clean_title("  - \"Sapiens\""), "Sapiens");
/// assert_eq!(clean_title("The \"Best\" Year"), "The \"Best\" Year");
/// ```
#[must_use]
pub fn clean_title(title: &str) -> String {
    let mut current = title;
    loop {
        let stripped = current.trim_start_matches(is_leading_noise).trim_end();
        let next = strip_enclosing_quotes(stripped);
        if next.len() == current.len() {
            return next.to_string();
        }
        current = next;
    }
}
