//! Pictsense serializer.
//!
//! Kana are folded to hiragana and every remaining character is probed
//! against both the picture-game alphabet and Shift_JIS. Bound violations
//! are reported as critical diagnostics; the output is still produced.

use log::info;

use super::{ensure_not_empty, finish_lines, report_unserializable, select_answer};
use crate::dictionary::codec::substitution::{shift_jis_probe, Reduction, HIRAGANA_TABLE};
use crate::dictionary::context::Context;
use crate::dictionary::format::pictsense::{check_bounds, is_alphabet_char, MAX_WORD_LENGTH, MIN_WORD_LENGTH};
use crate::dictionary::types::error::Result;
use crate::dictionary::types::formats::{FormatType, SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::Dictionary;

pub const MIME: &str = "text/plain; charset=Shift_JIS";

/// An alphabet letter as it is stored: `ゔ` only in its katakana form.
fn is_output_char(c: char) -> bool {
    (is_alphabet_char(c) || c == 'ヴ') && shift_jis_probe(c)
}

pub const REDUCTION: Reduction = Reduction {
    table: HIRAGANA_TABLE,
    probe: is_output_char,
    fold_to_hiragana: true,
};

pub fn serialize(
    dictionary: &Dictionary,
    _options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as Pictsense", dictionary.len());
    ensure_not_empty(dictionary)?;

    let mut lines: Vec<String> = Vec::with_capacity(dictionary.len());
    for word in dictionary.words() {
        let accept = |a: &str| {
            (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&a.chars().count())
        };
        match select_answer(word, &REDUCTION, accept) {
            Some(answer) if !lines.contains(&answer) => lines.push(answer),
            Some(answer) => ctx
                .diagnostics
                .notice(format!("`{}` duplicates an earlier word; it was omitted", answer)),
            None => report_unserializable(word, ctx),
        }
    }

    if !lines.is_empty() {
        for problem in check_bounds(lines.iter().map(String::as_str)) {
            ctx.diagnostics.critical(problem);
        }
    }

    finish_lines(lines, dictionary, FormatType::Pictsense, MIME)
}
