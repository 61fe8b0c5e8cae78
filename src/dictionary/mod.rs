//! Core conversion module.
//!
//! A parse call turns source bytes into a [`Dictionary`]; a serialize call
//! turns a [`Dictionary`] into target bytes. Both run with a [`Context`]
//! carrying the collaborators and the diagnostics sink.

pub mod codec;
pub mod collab;
pub mod context;
pub mod format;
pub mod serialize;
pub mod types;
pub mod utils;
pub mod validate;

use log::info;

use format::DictionaryFormat;
pub use context::Context;
pub use types::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use types::error::{DictionaryError, MediaError, Result, WordError};
pub use types::formats::{FormatType, InteligenceoMode, ParseOptions, SerializeOptions, SerializedDictionary};
pub use types::models::{Dictionary, FieldMap, FieldName, MediaFile, MediaKind, Metadata, Word};

fn parse_as<F: DictionaryFormat>(input: &[u8], options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    F::parse(input, options, ctx)
}

fn serialize_as<F: DictionaryFormat>(
    dictionary: &Dictionary,
    options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    F::serialize(dictionary, options, ctx)
}

/// Parses `input` as `format`.
///
/// # Errors
/// Returns an error if:
/// - The input cannot be decoded
/// - The input violates a structural rule of the format
/// - A word the format cannot skip is rejected
pub fn parse(input: &[u8], format: FormatType, options: &ParseOptions, ctx: &mut Context) -> Result<Dictionary> {
    info!("Parsing {} bytes as {}", input.len(), format);
    match format {
        FormatType::Generic => parse_as::<format::Generic>(input, options, ctx),
        FormatType::Catchfeeling => parse_as::<format::Catchfeeling>(input, options, ctx),
        FormatType::Catchm => parse_as::<format::Catchm>(input, options, ctx),
        FormatType::Inteligenceo => parse_as::<format::Inteligenceo>(input, options, ctx),
        FormatType::Pictsense => parse_as::<format::Pictsense>(input, options, ctx),
    }
}

/// Serializes `dictionary` as `format`.
///
/// # Errors
/// Returns [`DictionaryError::EmptyOutput`] if no word can be represented
/// in the target format.
pub fn serialize(
    dictionary: &Dictionary,
    format: FormatType,
    options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    info!("Serializing {} words as {}", dictionary.len(), format);
    match format {
        FormatType::Generic => serialize_as::<format::Generic>(dictionary, options, ctx),
        FormatType::Catchfeeling => serialize_as::<format::Catchfeeling>(dictionary, options, ctx),
        FormatType::Catchm => serialize_as::<format::Catchm>(dictionary, options, ctx),
        FormatType::Inteligenceo => serialize_as::<format::Inteligenceo>(dictionary, options, ctx),
        FormatType::Pictsense => serialize_as::<format::Pictsense>(dictionary, options, ctx),
    }
}

/// Parses `input` as `from` and serializes the result as `to`.
pub fn convert(
    input: &[u8],
    from: FormatType,
    to: FormatType,
    parse_options: &ParseOptions,
    serialize_options: &SerializeOptions,
    ctx: &mut Context,
) -> Result<SerializedDictionary> {
    let dictionary = parse(input, from, parse_options, ctx)?;
    serialize(&dictionary, to, serialize_options, ctx)
}
