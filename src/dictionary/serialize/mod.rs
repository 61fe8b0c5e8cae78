//! Format serializers.
//!
//! Each serializer mirrors its parser. The legacy targets reduce every
//! value to what the target can hold; a word left without any
//! representable answer is reported as unserializable and omitted, and a
//! dictionary left without words fails with
//! [`EmptyOutput`](crate::dictionary::DictionaryError::EmptyOutput).
//!
//! # Submodules
//!
//! - [`generic`][]
//! - [`catchfeeling`][]
//! - [`catchm`][]
//! - [`inteligenceo`][]
//! - [`pictsense`][]

pub mod catchfeeling;
pub mod catchm;
pub mod generic;
pub mod inteligenceo;
pub mod pictsense;

use log::info;

use crate::dictionary::codec::encoding::encode_strict;
use crate::dictionary::codec::substitution::Reduction;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::{FormatType, SerializedDictionary};
use crate::dictionary::types::models::{Dictionary, Word};
use crate::dictionary::utils::{collapse_whitespace, is_kana, is_regex_value, join_crlf};

/// Character-class tier of an answer; lower is preferred by single-answer
/// targets. Tier 4 accepts letters and digits of any script.
pub fn tier(answer: &str) -> usize {
    let has_kana = answer.chars().any(is_kana);
    let only = |pred: fn(char) -> bool| answer.chars().all(pred);

    if only(is_kana) {
        0
    } else if has_kana && only(|c| is_kana(c) || c.is_ascii_digit()) {
        1
    } else if has_kana && only(|c| is_kana(c) || c.is_ascii_alphanumeric()) {
        2
    } else if only(|c| c.is_ascii_alphabetic()) {
        3
    } else if only(|c| c.is_alphanumeric() || is_kana(c)) {
        4
    } else {
        5
    }
}

/// Number of characters outside kana.
fn violations(answer: &str) -> usize {
    answer.chars().filter(|c| !is_kana(*c)).count()
}

/// Plain answers of `candidates` ordered by tier, then by fewest non-kana
/// characters. Ties keep their original order.
pub fn rank_answers<'a>(candidates: &[&'a str]) -> Vec<&'a str> {
    let mut ranked: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|a| !is_regex_value(a))
        .collect();
    ranked.sort_by_key(|a| (tier(a), violations(a)));
    ranked
}

/// The best-ranked answer of `word` that reduces cleanly and passes `accept`.
pub fn select_answer(word: &Word, reduction: &Reduction, accept: impl Fn(&str) -> bool) -> Option<String> {
    rank_answers(&word.effective_answers())
        .into_iter()
        .filter_map(|a| reduction.reduce(a))
        .find(|a| accept(a))
}

/// Every answer of `word`, in order, that reduces cleanly and passes `accept`.
pub fn reduce_answers(word: &Word, reduction: &Reduction, accept: impl Fn(&str) -> bool) -> Vec<String> {
    word.effective_answers()
        .into_iter()
        .filter_map(|a| reduction.reduce(a))
        .filter(|a| accept(a))
        .collect()
}

/// [`reduce_answers`] with each answer's `bonus` kept beside it.
pub fn reduce_answers_with_bonuses(
    word: &Word,
    reduction: &Reduction,
    accept: impl Fn(&str) -> bool,
) -> Vec<(String, i64)> {
    word.effective_answers()
        .into_iter()
        .zip(word.bonuses())
        .filter_map(|(a, bonus)| reduction.reduce(a).map(|a| (a, bonus)))
        .filter(|(a, _)| accept(a))
        .collect()
}

/// Single-line, reduced rendering of free text.
pub fn reduce_text(text: &str, reduction: &Reduction) -> String {
    reduction.reduce_lossy(&collapse_whitespace(text))
}

pub fn report_unserializable(word: &Word, ctx: &mut Context) {
    ctx.diagnostics.error(format!(
        "`{}`: unserializable word; no answer can be represented in the target format, so it was omitted",
        word.text()
    ));
}

/// Output file name: the dictionary title with path-hostile characters
/// replaced, or `dictionary`.
pub fn output_file_name(dictionary: &Dictionary, extension: &str) -> String {
    let is_hostile = |c: char| {
        c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
    };
    let stem = dictionary
        .title()
        .map(|t| t.chars().map(|c| if is_hostile(c) { '_' } else { c }).collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "dictionary".to_string());
    format!("{}.{}", stem, extension)
}

pub(crate) fn ensure_not_empty(dictionary: &Dictionary) -> Result<()> {
    if dictionary.is_empty() {
        return Err(DictionaryError::EmptyOutput("the dictionary has no words".to_string()));
    }
    Ok(())
}

/// Encodes the lines of a text target, CRLF-terminated.
pub(crate) fn finish_lines(
    lines: Vec<String>,
    dictionary: &Dictionary,
    format: FormatType,
    mime: &'static str,
) -> Result<SerializedDictionary> {
    if lines.is_empty() {
        return Err(DictionaryError::EmptyOutput(format!(
            "no word can be represented in the {} format",
            format
        )));
    }
    let bytes = encode_strict(&join_crlf(&lines), format.output_encoding())?;
    info!("Serialized {} lines as {}", lines.len(), format);
    Ok(SerializedDictionary {
        bytes,
        file_name: output_file_name(dictionary, format.extension()),
        mime,
    })
}
