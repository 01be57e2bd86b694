//! CB-005: Free-text name normalization.
//!
//! Cleans a handwritten name into a display name:
//! `"meatball_-_sub"` → `"Meatball Sub"`, `"Riz@z RISO00tto!"` → `"Rizz Risotto"`.
//! Input that is empty after cleaning is rejected.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_-]+").expect("separator pattern is valid"));
static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("non-alpha pattern is valid"));

/// Input that normalizes to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid name: {input:?} has no letters")]
pub struct InvalidName {
    pub input: String,
}

/// Normalize a free-text name.
///
/// Underscore/hyphen runs become spaces, anything other than ASCII letters
/// and whitespace is dropped, whitespace collapses to single spaces, and each
/// word is title-cased.
pub fn normalize_name(input: &str) -> Result<String, InvalidName> {
    let spaced = SEPARATORS.replace_all(input, " ");
    let letters = NON_ALPHA.replace_all(&spaced, "");

    let words: Vec<String> = letters.split_whitespace().map(title_case).collect();
    if words.is_empty() {
        return Err(InvalidName {
            input: input.to_string(),
        });
    }
    Ok(words.join(" "))
}

fn title_case(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
