//! Canonical number validator.
//!
//! A canonical number is minimal decimal text: no leading `+`, no leading
//! zeros, no trailing `.0` (or trailing fractional zeros), and never `-0`.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::Correction;
use crate::dictionary::types::diagnostics::Diagnostic;

/// The grammar a number field is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberKind {
    Integer,
    #[default]
    Real,
}

static INTEGER: OnceLock<Regex> = OnceLock::new();
static REAL: OnceLock<Regex> = OnceLock::new();
static LEADING_NUMBER: OnceLock<Regex> = OnceLock::new();

fn integer_regex() -> &'static Regex {
    INTEGER.get_or_init(|| Regex::new(r"^(?:0|-?[1-9][0-9]*)$").expect("Invalid integer pattern"))
}

fn real_regex() -> &'static Regex {
    REAL.get_or_init(|| {
        Regex::new(r"^(?:0|-?(?:[1-9][0-9]*|0\.[0-9]*[1-9])|-?[1-9][0-9]*\.[0-9]*[1-9])$")
            .expect("Invalid real number pattern")
    })
}

fn leading_number_regex() -> &'static Regex {
    LEADING_NUMBER.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("Invalid leading number pattern")
    })
}

/// Whether `value` is already canonical for `kind`.
pub fn is_canonical(value: &str, kind: NumberKind) -> bool {
    match kind {
        NumberKind::Integer => integer_regex().is_match(value),
        NumberKind::Real => real_regex().is_match(value),
    }
}

/// Parses the leading numeric portion of a (NFKC-normalized, trimmed) string.
pub fn parse_lenient(value: &str) -> Option<f64> {
    let normalized: String = value.nfkc().collect();
    let trimmed = normalized.trim();
    let m = leading_number_regex().find(trimmed)?;
    let parsed: f64 = m.as_str().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Renders a finite number canonically for `kind`.
pub fn render(number: f64, kind: NumberKind) -> String {
    let number = match kind {
        NumberKind::Integer => number.trunc(),
        NumberKind::Real => number,
    };
    // `-0.0` and anything that rounds to it
    if number == 0.0 {
        return "0".to_string();
    }
    let rendered = format!("{}", number);
    if rendered.contains('.') {
        let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    } else {
        rendered
    }
}

/// Validates and, if necessary, coerces a number field.
pub fn correct(value: &str, kind: NumberKind) -> Correction {
    if is_canonical(value, kind) {
        return Correction::valid(value);
    }

    match parse_lenient(value) {
        Some(number) => {
            let corrected = render(number, kind);
            Correction::corrected(
                corrected.clone(),
                Diagnostic::error(format!("Number `{}` was corrected to `{}`", value, corrected)),
            )
        }
        None => Correction::dropped(Diagnostic::error(format!(
            "`{}` cannot be read as a number; the field was dropped",
            value
        ))),
    }
}
