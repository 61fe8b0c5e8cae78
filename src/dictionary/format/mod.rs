//! Format parsers and the [`DictionaryFormat`] trait tying each format to
//! its parser and serializer.
//!
//! # Submodules
//!
//! - [`generic`][]: CSV, or ZIP of `dictionary.csv` plus media
//! - [`catchfeeling`][]: `answer // comment` lines
//! - [`catchm`][]: `answer` lines with `//` or `#` comments
//! - [`inteligenceo`][]: shiritori lists and `Q,`/`A,` quiz pairs
//! - [`pictsense`][]: hiragana-only word list
//! - [`regard`][]: `@regard` derivation shared by the line formats

pub mod catchfeeling;
pub mod catchm;
pub mod generic;
pub mod inteligenceo;
pub mod pictsense;
pub mod regard;

use std::path::Path;

use log::debug;

use crate::dictionary::context::Context;
use crate::dictionary::serialize;
use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::types::formats::{FormatType, ParseOptions, SerializeOptions, SerializedDictionary};
use crate::dictionary::types::models::{Dictionary, FieldMap, FieldName};

/// The behavior of one dictionary format.
pub trait DictionaryFormat {
    /// The format this implementation handles.
    const FORMAT: FormatType;

    /// Builds a dictionary from source bytes.
    fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary>;

    /// Renders a dictionary into target bytes.
    fn serialize(
        dictionary: &Dictionary,
        options: &SerializeOptions,
        ctx: &mut Context,
    ) -> Result<SerializedDictionary>;
}

/// Zero-cost marker for the generic CSV/ZIP format.
#[derive(Debug)]
pub struct Generic;

/// Zero-cost marker for the Catchfeeling format.
#[derive(Debug)]
pub struct Catchfeeling;

/// Zero-cost marker for the Catchm format.
#[derive(Debug)]
pub struct Catchm;

/// Zero-cost marker for the Inteligenceω format.
#[derive(Debug)]
pub struct Inteligenceo;

/// Zero-cost marker for the Pictsense format.
#[derive(Debug)]
pub struct Pictsense;

macro_rules! impl_format {
    ($marker:ident, $variant:ident, $module:ident) => {
        impl DictionaryFormat for $marker {
            const FORMAT: FormatType = FormatType::$variant;

            fn parse(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
                $module::parse(input, options, ctx)
            }

            fn serialize(
                dictionary: &Dictionary,
                options: &SerializeOptions,
                ctx: &mut Context,
            ) -> Result<SerializedDictionary> {
                serialize::$module::serialize(dictionary, options, ctx)
            }
        }
    };
}

impl_format!(Generic, Generic, generic);
impl_format!(Catchfeeling, Catchfeeling, catchfeeling);
impl_format!(Catchm, Catchm, catchm);
impl_format!(Inteligenceo, Inteligenceo, inteligenceo);
impl_format!(Pictsense, Pictsense, pictsense);

/// Splits a line at the earliest of `delimiters` into a trimmed answer and
/// an optional trimmed, non-empty comment.
pub(crate) fn split_comment<'a>(line: &'a str, delimiters: &[&str]) -> (&'a str, Option<&'a str>) {
    let split = delimiters
        .iter()
        .filter_map(|d| line.find(d).map(|idx| (idx, d.len())))
        .min_by_key(|(idx, _)| *idx);
    match split {
        Some((idx, len)) => {
            let comment = line[idx + len..].trim();
            (line[..idx].trim(), (!comment.is_empty()).then_some(comment))
        }
        None => (line.trim(), None),
    }
}

/// Stem of the source file name, if one was given.
pub(crate) fn title_from_file_name(options: &ParseOptions) -> Option<String> {
    let name = options.file_name.as_deref()?;
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rejects an empty parse and fills `@title` from the file name.
pub(crate) fn finish(dictionary: &mut Dictionary, options: &ParseOptions, ctx: &mut Context) -> Result<()> {
    if dictionary.is_empty() {
        return Err(DictionaryError::Syntax("the dictionary contains no words".to_string()));
    }
    if dictionary.title().is_none() {
        if let Some(title) = title_from_file_name(options) {
            debug!("Using `{}` as the dictionary title", title);
            let fields = FieldMap::new().with(FieldName::Title.as_str(), title);
            dictionary.set_meta_fields(&fields, ctx)?;
        }
    }
    Ok(())
}

/// [`finish`] plus the derived `@regard` of the line formats.
pub(crate) fn finish_with_regard(
    dictionary: &mut Dictionary,
    options: &ParseOptions,
    ctx: &mut Context,
) -> Result<()> {
    finish(dictionary, options, ctx)?;
    if let Some(class) = regard::derive(&regard::distinct_characters(dictionary.words())) {
        let fields = FieldMap::new().with(FieldName::Regard.as_str(), class);
        dictionary.set_meta_fields(&fields, ctx)?;
    }
    Ok(())
}
