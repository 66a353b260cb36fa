//! [`FuzzPattern`] definition.

use derive_more::Display;
use itertools::Itertools as _;
use postgres_types::{FromSql, ToSql};

/// Characters having a special meaning in a `SIMILAR TO` pattern.
const METACHARS: &[char] = &[
    '\\', '%', '_', '|', '*', '+', '?', '{', '}', '(', ')', '[', ']',
];

/// `SIMILAR TO` pattern matching a text containing any word of a search
/// input.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(String);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] out of the provided search `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let words = input
            .split_ascii_whitespace()
            .map(|word| format!("%{}%", escape(word)))
            .join("|");
        Self(format!("({words})"))
    }
}

/// Escapes [`METACHARS`] in the provided `word`.
fn escape(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if METACHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn matches_any_word() {
        assert_eq!(
            FuzzPattern::new("  Sunrise   court ").to_string(),
            "(%Sunrise%|%court%)",
        );
    }

    #[test]
    fn escapes_metachars() {
        assert_eq!(
            FuzzPattern::new("50% (b_1)").to_string(),
            r"(%50\%%|%\(b\_1\)%)",
        );
    }
}
