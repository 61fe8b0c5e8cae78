//! Answer / option validator.
//!
//! An answer is either a plain string or a regex pattern delimited by `/…/`.
//! Both must already be NFKC-normalized. Regex interiors are restricted to a
//! character subset that survives the legacy encodings: no Latin uppercase,
//! no katakana and nothing outside the Basic Multilingual Plane.

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::{is_nfkc, UnicodeNormalization};

use super::Correction;
use crate::dictionary::types::diagnostics::Diagnostic;
use crate::dictionary::utils::{is_kana_str, is_regex_value, regex_interior};

/// Characters allowed inside a `/…/` pattern.
pub fn is_regex_safe_char(c: char) -> bool {
    match c {
        '!'..='~' => !c.is_ascii_uppercase(),
        '\u{3041}'..='\u{3096}' | '\u{309D}' | '\u{309E}' => true,
        'ー' | '〜' | '々' | '〆' | '〇' => true,
        '\u{4E00}'..='\u{9FFF}' => true,
        _ => false,
    }
}

/// Invisible formatting characters that are never part of an answer.
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}

/// Characters allowed in a plain answer.
pub fn is_plain_char(c: char) -> bool {
    !(c.is_control() || c.is_whitespace() || is_combining_mark(c) || is_format_char(c) || c == '~')
}

/// Whether `value` is a syntactically valid, compilable regex answer.
pub fn is_valid_regex(value: &str) -> bool {
    if !is_regex_value(value) {
        return false;
    }
    let interior = regex_interior(value);
    !interior.is_empty() && interior.chars().all(is_regex_safe_char) && Regex::new(interior).is_ok()
}

/// Whether `value` is a valid plain answer.
pub fn is_valid_plain(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_plain_char)
}

/// Whether `value` needs no correction at all.
pub fn is_valid(value: &str) -> bool {
    is_nfkc(value) && (is_valid_regex(value) || (!is_regex_value(value) && is_valid_plain(value)))
}

fn strip_plain(value: &str) -> String {
    let stripped: String = value
        .replace('~', "〜")
        .chars()
        .filter(|&c| is_plain_char(c))
        .collect();
    if is_nfkc(&stripped) {
        return stripped;
    }
    // removing characters can leave a composable sequence behind
    stripped
        .nfkc()
        .collect::<String>()
        .replace('~', "〜")
        .chars()
        .filter(|&c| is_plain_char(c))
        .collect()
}

fn advise(value: &str) -> Option<Diagnostic> {
    if value.is_empty() || is_regex_value(value) || is_kana_str(value) {
        None
    } else {
        Some(Diagnostic::notice(format!(
            "Answer `{}` contains characters other than hiragana and katakana",
            value
        )))
    }
}

/// Validates an `answer` or `option` value, correcting it where possible.
pub fn correct(value: &str) -> Correction {
    if is_valid(value) {
        let mut correction = Correction::valid(value);
        correction.diagnostics.extend(advise(value));
        return correction;
    }

    let mut corrected: String = value.nfkc().collect();
    // Stripping a rejected regex can expose another `/…/` value. Every
    // regex pass removes two delimiters and a plain pass is a fixed point.
    loop {
        if corrected.is_empty() || is_valid(&corrected) {
            break;
        }
        let next = if is_regex_value(&corrected) {
            strip_plain(regex_interior(&corrected))
        } else {
            strip_plain(&corrected)
        };
        if next == corrected {
            break;
        }
        corrected = next;
    }

    if corrected.is_empty() {
        return Correction::dropped(Diagnostic::error(format!(
            "Answer `{}` contains no usable characters; it was dropped",
            value
        )));
    }

    let mut correction = Correction::corrected(
        corrected.clone(),
        Diagnostic::error(format!("Answer `{}` was corrected to `{}`", value, corrected)),
    );
    correction.diagnostics.extend(advise(&corrected));
    correction
}
