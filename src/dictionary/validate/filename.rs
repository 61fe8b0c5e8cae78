//! Archive member name validator.
//!
//! A valid name matches `[a-z0-9_][-a-z0-9_]{0,25}.<ext>` for one of the
//! extensions allowed for the member's media type and does not collide with
//! a name already in the bundle.

use unicode_normalization::UnicodeNormalization;

use super::file_location::fallback_token;
use super::Correction;
use crate::dictionary::collab::romanize::Romanizer;
use crate::dictionary::types::diagnostics::Diagnostic;

/// Maximum length of the part before the extension.
pub const MAX_STEM_LEN: usize = 26;

const RESERVED_STEMS: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

fn is_stem_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}

fn is_valid_stem(stem: &str) -> bool {
    let len = stem.chars().count();
    (1..=MAX_STEM_LEN).contains(&len)
        && stem.chars().all(is_stem_char)
        && !stem.starts_with('-')
        && !RESERVED_STEMS.contains(&stem)
}

fn is_duplicate(name: &str, existing: &[String]) -> bool {
    existing.iter().any(|other| other.eq_ignore_ascii_case(name))
}

/// Whether `name` can be used unchanged.
pub fn is_valid(name: &str, extensions: &[&str], existing: &[String]) -> bool {
    let (stem, ext) = split_extension(name);
    is_valid_stem(stem) && extensions.contains(&ext) && !is_duplicate(name, existing)
}

fn normalize_extension<'a>(ext: &str, extensions: &[&'a str]) -> &'a str {
    let lowered = ext.to_ascii_lowercase();
    let lowered = if lowered == "jpeg" { "jpg".to_string() } else { lowered };
    extensions
        .iter()
        .copied()
        .find(|allowed| *allowed == lowered)
        .or_else(|| extensions.first().copied())
        .unwrap_or("bin")
}

fn sanitize_stem(stem: &str, romanizer: &dyn Romanizer) -> String {
    let composed: String = stem.nfc().collect();
    let latin = romanizer.transliterate(&composed);
    let replaced: String = latin
        .to_lowercase()
        .chars()
        .map(|c| if is_stem_char(c) { c } else { '-' })
        .collect();
    let capped: String = replaced.trim_matches('-').chars().take(MAX_STEM_LEN).collect();
    capped.trim_end_matches('-').to_string()
}

/// Corrects an archive member name, resolving collisions against `existing`.
pub fn correct(
    name: &str,
    extensions: &[&str],
    existing: &[String],
    romanizer: &dyn Romanizer,
) -> Correction {
    if is_valid(name, extensions, existing) {
        return Correction::valid(name);
    }

    let (stem, ext) = split_extension(name);
    let ext = normalize_extension(ext, extensions);

    let mut stem = sanitize_stem(stem, romanizer);
    if stem.is_empty() {
        stem = fallback_token(name);
    }
    if RESERVED_STEMS.contains(&stem.as_str()) {
        stem.push('-');
    }

    let mut candidate = format!("{}.{}", stem, ext);
    while is_duplicate(&candidate, existing) && stem.len() < MAX_STEM_LEN {
        stem.push('-');
        candidate = format!("{}.{}", stem, ext);
    }
    let mut attempt = 0usize;
    while is_duplicate(&candidate, existing) {
        attempt += 1;
        candidate = format!("{}.{}", fallback_token(&format!("{}#{}", name, attempt)), ext);
    }

    Correction::corrected(
        candidate.clone(),
        Diagnostic::error(format!("File name `{}` was changed to `{}`", name, candidate)),
    )
}
