//! Pictsense parser.
//!
//! One hiragana word per line. `ヴ` is folded to `ゔ`; any other character
//! outside the alphabet is fatal. Length and count bounds are checked once
//! the whole input has been read.

use log::info;

use super::finish;
use crate::dictionary::codec::encoding::decode_legacy;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::ParseOptions;
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName};
use crate::dictionary::utils::{normalize_newlines, split_lines};

pub const MIN_WORD_LENGTH: usize = 1;
pub const MAX_WORD_LENGTH: usize = 20;
pub const MAX_TOTAL_LENGTH: usize = 12_000;
pub const MIN_WORDS: usize = 5;
pub const MAX_WORDS: usize = 500;

/// Whether `c` belongs to the picture-game alphabet.
pub fn is_alphabet_char(c: char) -> bool {
    matches!(c, 'ぁ'..='ゔ' | 'ー')
}

/// Folds the one katakana letter the alphabet accepts.
pub fn fold(word: &str) -> String {
    word.replace('ヴ', "ゔ")
}

/// Violations of the length and count bounds for `words`, if any.
pub fn check_bounds<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut problems = Vec::new();
    let mut count = 0usize;
    let mut total = 0usize;
    for word in words {
        count += 1;
        let len = word.chars().count();
        total += len;
        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&len) {
            problems.push(format!(
                "`{}` has {} characters; words must have {} to {}",
                word, len, MIN_WORD_LENGTH, MAX_WORD_LENGTH
            ));
        }
    }
    if total > MAX_TOTAL_LENGTH {
        problems.push(format!(
            "the words total {} characters; at most {} are allowed",
            total, MAX_TOTAL_LENGTH
        ));
    }
    if !(MIN_WORDS..=MAX_WORDS).contains(&count) {
        problems.push(format!(
            "the dictionary has {} words; {} to {} are required",
            count, MIN_WORDS, MAX_WORDS
        ));
    }
    problems
}

pub fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing Pictsense dictionary ({} bytes)", input.len());
    let text = normalize_newlines(&decode_legacy(input)?);
    let mut dictionary = Dictionary::new();

    for (idx, line) in split_lines(&text).into_iter().enumerate() {
        let word = fold(line.trim());
        if word.is_empty() {
            continue;
        }
        if let Some(c) = word.chars().find(|c| !is_alphabet_char(*c)) {
            return Err(DictionaryError::Syntax(format!(
                "line {}: `{}` is not allowed in `{}`",
                idx + 1,
                c,
                word
            )));
        }
        let fields = FieldMap::new().with(FieldName::Text.as_str(), word);
        dictionary
            .add_word(&fields, ctx)
            .map_err(|e| DictionaryError::Syntax(format!("line {}: {}", idx + 1, e)))?;
    }

    let problems = check_bounds(dictionary.words().iter().map(|w| w.text()));
    if !problems.is_empty() {
        return Err(DictionaryError::Syntax(problems.join("; ")));
    }

    finish(&mut dictionary, options, ctx)?;
    info!("Parsed {} words", dictionary.len());
    Ok(dictionary)
}
