//! Catchm parser.

use log::{info, trace};

use super::{finish_with_regard, split_comment};
use crate::dictionary::codec::encoding::decode_legacy;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::Result;
use crate::dictionary::types::formats::ParseOptions;
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName};
use crate::dictionary::utils::{normalize_newlines, split_lines};

pub const COMMENT_DELIMITERS: &[&str] = &["//", "#"];

/// Parses `answer [// comment | # comment]` lines. Blank lines are ignored;
/// a line whose word is rejected is discarded as a whole.
pub fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing Catchm dictionary ({} bytes)", input.len());
    let text = normalize_newlines(&decode_legacy(input)?);
    let mut dictionary = Dictionary::new();

    for (idx, line) in split_lines(&text).into_iter().enumerate() {
        if line.trim().is_empty() {
            trace!("line {}: blank, ignored", idx + 1);
            continue;
        }

        let (answer, comment) = split_comment(line, COMMENT_DELIMITERS);
        if answer.is_empty() {
            trace!("line {}: comment only, ignored", idx + 1);
            continue;
        }
        let mut fields = FieldMap::new().with(FieldName::Text.as_str(), answer);
        if let Some(comment) = comment {
            fields.push(FieldName::Description.as_str(), comment);
        }

        if let Err(e) = dictionary.add_word(&fields, ctx) {
            ctx.diagnostics
                .error(format!("line {}: {}; the line was discarded", idx + 1, e));
        }
    }

    finish_with_regard(&mut dictionary, options, ctx)?;
    info!("Parsed {} words", dictionary.len());
    Ok(dictionary)
}
