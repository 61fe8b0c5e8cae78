//! File location validator for `image`, `audio` and `video` fields.
//!
//! A location is either the exact name of a bundled file or an absolute URI
//! with an allow-listed scheme. Everything else is corrected, in order, by:
//! case-insensitive bundled match, URI reinterpretation, retrying both with
//! the trailing path component, and finally a synthesized `tag:` URI.

use sha2::{Digest, Sha256};
use url::Url;

use super::Correction;
use crate::dictionary::types::diagnostics::Diagnostic;

/// Prefix of the `tag:` URIs synthesized for unresolvable local names.
pub const LOCAL_TAG_PREFIX: &str = "tag:pokemori.jp,2016:local:";

/// Schemes accepted for absolute URIs. `http` is upgraded to `https`.
pub const ALLOWED_SCHEMES: &[&str] = &["https", "tag", "urn"];

/// Returns the accepted form of `value` as an absolute URI, if any.
fn as_absolute_uri(value: &str) -> Option<String> {
    let mut url = Url::parse(value).ok()?;
    if url.scheme() == "http" {
        url.set_scheme("https").ok()?;
        return Some(url.to_string());
    }
    ALLOWED_SCHEMES
        .contains(&url.scheme())
        .then(|| if url.as_str() == value { value.to_string() } else { url.to_string() })
}

fn find_case_insensitive<'a>(value: &str, bundled: &'a [String]) -> Option<&'a String> {
    let lowered = value.to_lowercase();
    bundled.iter().find(|name| name.to_lowercase() == lowered)
}

/// Trailing path component with any query string or fragment removed.
pub fn basename(value: &str) -> &str {
    let without_suffix = value
        .split(['?', '#'])
        .next()
        .unwrap_or(value);
    without_suffix
        .rsplit(['/', '\\'])
        .find(|part| !part.trim().is_empty())
        .unwrap_or("")
        .trim()
}

/// A short token derived from `seed`, used where no usable name exists.
pub fn fallback_token(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    hex::encode(&digest[..8])
}

fn local_tag(name: &str) -> String {
    let candidate = format!("{}{}", LOCAL_TAG_PREFIX, name);
    match Url::parse(&candidate) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", LOCAL_TAG_PREFIX, fallback_token(name)),
    }
}

/// Validates a file location against the list of bundled file names.
pub fn correct(value: &str, bundled: &[String]) -> Correction {
    if bundled.iter().any(|name| name == value) {
        return Correction::valid(value);
    }

    if let Some(uri) = as_absolute_uri(value) {
        // an http upgrade is silent
        return Correction::valid(uri);
    }

    let trimmed = value.trim();
    let corrected_to = |to: String| {
        Correction::corrected(
            to.clone(),
            Diagnostic::error(format!("File location `{}` was corrected to `{}`", value, to)),
        )
    };

    if let Some(name) = find_case_insensitive(trimmed, bundled) {
        return corrected_to(name.clone());
    }
    if let Some(uri) = as_absolute_uri(trimmed) {
        return corrected_to(uri);
    }

    let base = basename(trimmed);
    if !base.is_empty() {
        if let Some(name) = bundled.iter().find(|name| name.as_str() == base) {
            return corrected_to(name.clone());
        }
        if let Some(name) = find_case_insensitive(base, bundled) {
            return corrected_to(name.clone());
        }
        if let Some(uri) = as_absolute_uri(base) {
            return corrected_to(uri);
        }
        return corrected_to(local_tag(base));
    }

    corrected_to(local_tag(&fallback_token(value)))
}
