//! Catchfeeling parser.
//!
//! One word per line: `answer`, optionally followed by `// comment`.
//! Blank lines are fatal; a line whose word is rejected is logged and skipped.

use log::info;

use super::{finish_with_regard, split_comment};
use crate::dictionary::codec::encoding::decode_legacy;
use crate::dictionary::context::Context;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::ParseOptions;
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName};
use crate::dictionary::utils::{normalize_newlines, split_lines};

pub const COMMENT_DELIMITERS: &[&str] = &["//"];

pub fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing Catchfeeling dictionary ({} bytes)", input.len());
    let text = normalize_newlines(&decode_legacy(input)?);
    let mut dictionary = Dictionary::new();

    for (idx, line) in split_lines(&text).into_iter().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            return Err(DictionaryError::Syntax(format!("line {}: blank line", line_no)));
        }

        let (answer, comment) = split_comment(line, COMMENT_DELIMITERS);
        let mut fields = FieldMap::new().with(FieldName::Text.as_str(), answer);
        if let Some(comment) = comment {
            fields.push(FieldName::Description.as_str(), comment);
        }

        if let Err(e) = dictionary.add_word(&fields, ctx) {
            ctx.diagnostics
                .error(format!("line {}: {}; the line was skipped", line_no, e));
        }
    }

    finish_with_regard(&mut dictionary, options, ctx)?;
    info!("Parsed {} words", dictionary.len());
    Ok(dictionary)
}
