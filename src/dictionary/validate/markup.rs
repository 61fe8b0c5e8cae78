//! Lightweight markup validator.
//!
//! The source markup and its sanitized HTML rendering are produced together
//! and stored together, so they never drift apart.

use crate::dictionary::collab::markup::{MarkupRenderer, Whitelist};
use crate::dictionary::types::diagnostics::Diagnostic;

/// A markup field value: source markup plus its sanitized HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupValue {
    pub source: String,
    pub html: String,
}

/// Renders and sanitizes `value`. Content removed by the sanitizer is
/// reported, the sanitized HTML is converted back to markup and validated
/// once more; a result that is still unclean is accepted as is.
pub fn validate(
    value: &str,
    whitelist: Whitelist,
    bundled: &[String],
    renderer: &dyn MarkupRenderer,
) -> (Option<MarkupValue>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    if value.trim().is_empty() {
        return (None, diagnostics);
    }

    let sanitized = renderer.sanitize(&renderer.to_html(value), whitelist, bundled);
    if sanitized.is_clean() {
        let markup = MarkupValue {
            source: value.to_string(),
            html: sanitized.html,
        };
        return (Some(markup), diagnostics);
    }

    for note in &sanitized.removed {
        diagnostics.push(Diagnostic::error(format!("Markup `{}`: {}", value, note)));
    }

    let source = renderer.to_markup(&sanitized.html);
    if source.trim().is_empty() {
        diagnostics.push(Diagnostic::error(format!(
            "Markup `{}` has no content left after sanitization; it was dropped",
            value
        )));
        return (None, diagnostics);
    }

    let resanitized = renderer.sanitize(&renderer.to_html(&source), whitelist, bundled);
    if !resanitized.is_clean() {
        diagnostics.push(Diagnostic::warning(format!(
            "Markup `{}` could not be fully cleaned; keeping the degraded rendering",
            source
        )));
    }
    if resanitized.html.trim().is_empty() {
        return (None, diagnostics);
    }

    let markup = MarkupValue {
        source,
        html: resanitized.html,
    };
    (Some(markup), diagnostics)
}
