//! Encoding detection and transcoding.

use encoding_rs::{Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_8};
use log::debug;

use crate::dictionary::types::error::{DictionaryError, Result};
use crate::dictionary::utils::{is_hiragana, is_katakana};

/// Decodes `bytes` only if they are entirely valid in `encoding`.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Decodes a legacy text dictionary: UTF-8 when valid (BOM stripped),
/// otherwise strict Shift_JIS.
pub fn decode_legacy(bytes: &[u8]) -> Result<String> {
    let without_bom = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(without_bom) {
        debug!("Decoded legacy input as UTF-8");
        return Ok(text.to_string());
    }
    let text = decode_strict(bytes, SHIFT_JIS).ok_or_else(|| {
        DictionaryError::Encoding("the input is neither UTF-8 nor Shift_JIS".to_string())
    })?;
    debug!("Decoded legacy input as Shift_JIS");
    Ok(text)
}

/// Share of kana and CJK ideographs, used to choose between legacy
/// encodings that both decode without errors.
fn japanese_score(text: &str) -> usize {
    text.chars()
        .filter(|&c| is_hiragana(c) || is_katakana(c) || ('\u{4E00}'..='\u{9FFF}').contains(&c))
        .count()
}

/// Detects the encoding of a CSV stream and decodes it.
///
/// A byte order mark wins; ISO-2022-JP is recognized by its escape
/// sequences; then UTF-8, then whichever of Shift_JIS and EUC-JP decodes
/// strictly into more Japanese text.
pub fn detect_and_decode(bytes: &[u8]) -> Result<(String, &'static Encoding)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) = decode_strict(&bytes[bom_len..], encoding) {
            debug!("Detected {} from its byte order mark", encoding.name());
            return Ok((text, encoding));
        }
    }

    if bytes.windows(2).any(|w| w == b"\x1B$") {
        if let Some(text) = decode_strict(bytes, ISO_2022_JP) {
            debug!("Detected ISO-2022-JP escape sequences");
            return Ok((text, ISO_2022_JP));
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), UTF_8));
    }

    let candidates: Vec<(String, &'static Encoding)> = [SHIFT_JIS, EUC_JP]
        .into_iter()
        .filter_map(|encoding| decode_strict(bytes, encoding).map(|text| (text, encoding)))
        .collect();

    let best = candidates
        .into_iter()
        .enumerate()
        .max_by_key(|(idx, (text, _))| (japanese_score(text), std::cmp::Reverse(*idx)))
        .map(|(_, candidate)| candidate);

    match best {
        Some((text, encoding)) => {
            debug!("Detected {}", encoding.name());
            Ok((text, encoding))
        }
        None => Err(DictionaryError::Encoding(
            "the CSV could not be decoded as UTF-8, Shift_JIS, EUC-JP or ISO-2022-JP".to_string(),
        )),
    }
}

/// Encodes `text`, failing if any character is unmappable.
pub fn encode_strict(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(DictionaryError::Encoding(format!(
            "the output contains characters {} cannot represent",
            encoding.name()
        )));
    }
    Ok(bytes.into_owned())
}
