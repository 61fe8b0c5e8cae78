//! Catchm serializer.

use log::info;

use super::{ensure_not_empty, finish_lines, reduce_text, report_unserializable, select_answer};
use crate::dictionary::codec::substitution::Reduction;
use crate::dictionary::context::Context;
use crate::dictionary::format::catchm::COMMENT_DELIMITERS;
use crate::dictionary::types::error::Result;
use crate::dictionary::types::formats::{FormatType, SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::Dictionary;

pub const MIME: &str = "text/plain; charset=Shift_JIS";

pub fn serialize(
    dictionary: &Dictionary,
    _options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as Catchm", dictionary.len());
    ensure_not_empty(dictionary)?;
    let reduction = Reduction::SHIFT_JIS;

    let mut lines = Vec::with_capacity(dictionary.len());
    for word in dictionary.words() {
        let accept = |a: &str| !COMMENT_DELIMITERS.iter().any(|d| a.contains(d));
        let Some(answer) = select_answer(word, &reduction, accept) else {
            report_unserializable(word, ctx);
            continue;
        };
        let comment = word
            .description()
            .map(|d| reduce_text(&d.source, &reduction))
            .filter(|c| !c.is_empty());
        lines.push(match comment {
            Some(comment) => format!("{} // {}", answer, comment),
            None => answer,
        });
    }

    finish_lines(lines, dictionary, FormatType::Catchm, MIME)
}
