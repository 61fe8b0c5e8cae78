//! Catchfeeling serializer.

use log::info;

use super::{ensure_not_empty, finish_lines, reduce_text, report_unserializable, select_answer};
use crate::dictionary::codec::substitution::Reduction;
use crate::dictionary::context::Context;
use crate::dictionary::format::catchfeeling::COMMENT_DELIMITERS;
use crate::dictionary::types::error::Result;
use crate::dictionary::types::formats::{FormatType, SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::Dictionary;

pub const MIME: &str = "text/plain; charset=Shift_JIS";

/// Writes one `answer // description` line per word, choosing the
/// best-ranked answer that survives the Shift_JIS reduction.
pub fn serialize(
    dictionary: &Dictionary,
    _options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as Catchfeeling", dictionary.len());
    ensure_not_empty(dictionary)?;
    let reduction = Reduction::SHIFT_JIS;

    let mut lines = Vec::with_capacity(dictionary.len());
    for word in dictionary.words() {
        let accept = |a: &str| !COMMENT_DELIMITERS.iter().any(|d| a.contains(d));
        let Some(answer) = select_answer(word, &reduction, accept) else {
            report_unserializable(word, ctx);
            continue;
        };
        let line = match word.description() {
            Some(description) => format!(
                "{} // {}",
                answer,
                reduce_text(&description.source, &reduction)
            ),
            None => answer,
        };
        lines.push(line);
    }

    finish_lines(lines, dictionary, FormatType::Catchfeeling, MIME)
}
