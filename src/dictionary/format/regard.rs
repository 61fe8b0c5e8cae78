//! `@regard` derivation: the character class a dictionary's texts are drawn from.

use std::collections::BTreeSet;

use regex::Regex;

use crate::dictionary::types::models::Word;
use crate::dictionary::utils::unify_char;

/// Common classes, most specific first.
const RANKED_CLASSES: &[&str] = &[
    "[ぁ-ゖー]",
    "[a-z]",
    "[0-9]",
    "[0-9a-z]",
    "[ぁ-ゖー0-9]",
    "[ぁ-ゖーa-z]",
    "[ぁ-ゖー0-9a-z]",
];

/// Distinct case- and kana-unified characters of every word's `text`.
pub fn distinct_characters<'a>(words: impl IntoIterator<Item = &'a Word>) -> BTreeSet<char> {
    words
        .into_iter()
        .flat_map(|w| w.text().chars())
        .filter(|c| !c.is_whitespace())
        .map(unify_char)
        .collect()
}

fn escape_class_member(c: char, out: &mut String) {
    if matches!(c, '\\' | ']' | '[' | '^' | '-') {
        out.push('\\');
    }
    out.push(c);
}

/// The first ranked class covering `chars`, or an explicit class literal.
pub fn derive(chars: &BTreeSet<char>) -> Option<String> {
    if chars.is_empty() {
        return None;
    }

    for class in RANKED_CLASSES {
        let Ok(re) = Regex::new(&format!("^{}$", class)) else {
            continue;
        };
        let mut buf = [0u8; 4];
        if chars.iter().all(|c| re.is_match(c.encode_utf8(&mut buf))) {
            return Some((*class).to_string());
        }
    }

    let mut literal = String::from("[");
    for &c in chars {
        escape_class_member(c, &mut literal);
    }
    literal.push(']');
    Some(literal)
}
