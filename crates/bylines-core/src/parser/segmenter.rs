//! # Deterministic Segmenter
//!
//! Splits a run of concatenated `Title by Author` entries into pairs without
//! relying on delimiters between consecutive entries. The hard part is
//! finding where one author name stops and the next title starts; this is
//! done by scanning for a lowercase→uppercase transition, filtered through
//! the fixed exception tables below, and falling back to a word-level split
//! when entries are separated by plain spaces.

use crate::parser::cleaner::clean_title;
use crate::types::{BookCandidate, Provenance};

/// The token separating a title from its author.
pub const DELIMITER: &str = " by ";

/// Surname prefixes glued to a capitalized remainder ("McGregor", "DeLillo").
/// Matched case-insensitively and only at the start of a word.
pub const SURNAME_PREFIXES: &[&str] = &["mc", "mac", "de", "di", "du", "la", "le"];

/// Three-letter nobility/surname particles ("VanDyke", "DelVecchio").
/// Matched case-insensitively and only at the start of a word.
pub const NAME_PARTICLES: &[&str] = &["van", "von", "del", "der", "den"];

/// Abbreviated suffixes, recognized only with their trailing period.
pub const ABBREVIATED_SUFFIXES: &[&str] = &["Jr.", "Sr."];

/// Roman-numeral suffixes.
pub const ROMAN_SUFFIXES: &[&str] = &["III", "IV", "VI", "IX"];

/// Articles that open a title when splitting on word boundaries.
const TITLE_ARTICLES: &[&str] = &["The", "A", "An"];

/// Finds the next usable delimiter in `text`.
///
/// An occurrence followed by a lowercase word ("Standing by the River") is
/// part of a title when another delimiter follows within the same entry,
/// i.e. with no entry boundary in between. Otherwise it is the attribution
/// of an author written in lowercase ("bell hooks").
#[must_use]
pub fn find_delimiter(text: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(pos) = text[offset..].find(DELIMITER) {
        let at = offset + pos;
        let after = &text[at + DELIMITER.len()..];
        if !after.chars().next().is_some_and(char::is_lowercase) {
            return Some(at);
        }
        match after.find(DELIMITER) {
            Some(next) if case_boundary(&after[..next]).is_none() => offset = at + 1,
            _ => return Some(at),
        }
    }
    None
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Heuristic `Title by Author` segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter;

impl Segmenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Segments whitespace-normalized section text into (title, author) pairs,
    /// greedily, left to right.
    ///
    /// Pairs with an empty title or author are dropped.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<BookCandidate> {
        let mut books = Vec::new();
        let mut remaining = text.trim();

        while let Some(at) = find_delimiter(remaining) {
            let title = clean_title(&remaining[..at]);
            let rest = &remaining[at + DELIMITER.len()..];
            let end = self.author_end(rest);
            let author = rest[..end].trim();

            if !title.is_empty() && !author.is_empty() {
                books.push(BookCandidate::new(title, author, Provenance::Deterministic));
            }
            remaining = &rest[end..];
        }

        books
    }

    /// Byte offset in `rest` where the author ends and the next title begins.
    fn author_end(&self, rest: &str) -> usize {
        match find_delimiter(rest) {
            Some(next) => {
                let window = &rest[..next];
                case_boundary(window)
                    .or_else(|| word_boundary(window))
                    .unwrap_or(next)
            }
            None => case_boundary(rest).unwrap_or(rest.len()),
        }
    }
}

/// First lowercase→uppercase transition that is not covered by an exception,
/// or the first capitalized word glued right after a name suffix.
fn case_boundary(text: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for i in 1..chars.len() {
        let (pos, c) = chars[i];
        if !c.is_uppercase() {
            continue;
        }
        let prev = chars[i - 1].1;
        let next = chars.get(i + 1).map(|&(_, n)| n);

        if prev.is_lowercase() {
            if is_glued_prefix(&chars, i) || starts_suffix(&text[pos..]) {
                continue;
            }
            return Some(pos);
        }

        if ends_with_suffix(&text[..pos], next) {
            return Some(pos);
        }
    }

    None
}

/// True if the letters right before `chars[i]` form a whole-word surname
/// prefix or name particle.
fn is_glued_prefix(chars: &[(usize, char)], i: usize) -> bool {
    SURNAME_PREFIXES
        .iter()
        .chain(NAME_PARTICLES)
        .any(|prefix| {
            let n = prefix.chars().count();
            if i < n {
                return false;
            }
            let starts_word = i == n || !chars[i - n - 1].1.is_alphanumeric();
            let matches = chars[i - n..i]
                .iter()
                .map(|&(_, c)| c)
                .flat_map(char::to_lowercase)
                .eq(prefix.chars());
            starts_word && matches
        })
}

/// True if `text` opens with a name suffix that is not the start of a longer word.
fn starts_suffix(text: &str) -> bool {
    if ABBREVIATED_SUFFIXES.iter().any(|s| text.starts_with(s)) {
        return true;
    }
    ROMAN_SUFFIXES.iter().any(|s| {
        text.strip_prefix(s)
            .is_some_and(|tail| !tail.chars().next().is_some_and(char::is_lowercase))
    })
}

/// True if `head` ends with a name suffix and the character that follows it
/// opens a new capitalized word.
fn ends_with_suffix(head: &str, next: Option<char>) -> bool {
    let suffix_attached = |token: &&str| {
        head.strip_suffix(*token).is_some_and(|before| {
            before
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c.is_lowercase())
        })
    };

    if ABBREVIATED_SUFFIXES.iter().any(suffix_attached) {
        return true;
    }
    next.is_some_and(char::is_lowercase) && ROMAN_SUFFIXES.iter().any(suffix_attached)
}

/// Word-level split for space-separated entries: the next title is the last
/// capitalized word before the next delimiter, extended backwards over
/// lowercase connector runs ("Born a Crime") and a leading article.
fn word_boundary(window: &str) -> Option<usize> {
    let words: Vec<(usize, &str)> = window
        .split(' ')
        .scan(0usize, |offset, word| {
            let start = *offset;
            *offset += word.len() + 1;
            Some((start, word))
        })
        .filter(|(_, word)| !word.is_empty())
        .collect();

    if words.len() < 2 {
        return None;
    }

    let is_lower = |word: &str| word.chars().next().is_some_and(char::is_lowercase);

    let mut t = words.len() - 1;
    while t >= 2 && is_lower(words[t - 1].1) {
        let mut run_start = t - 1;
        while run_start >= 1 && is_lower(words[run_start - 1].1) {
            run_start -= 1;
        }
        if run_start < 2 {
            break;
        }
        t = run_start - 1;
    }

    if t >= 2 && TITLE_ARTICLES.contains(&words[t - 1].1) {
        t -= 1;
    }

    Some(words[t].0)
}
