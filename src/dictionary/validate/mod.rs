//! Field validators.
//!
//! Each validator owns one field grammar and exposes a `correct` function
//! returning a [`Correction`]: the corrected value (empty means "drop this
//! field occurrence") plus the diagnostics produced along the way.
//! Validators never fail for recoverable input; only the canonical model
//! turns missing required values into [`WordError`](crate::dictionary::WordError)s.
//!
//! # Submodules
//!
//! - [`answer`]: answers and options (plain text or `/regex/`)
//! - [`number`]: canonical integers and reals
//! - [`file_location`]: bundled file names and absolute URIs
//! - [`filename`]: archive member names
//! - [`markup`]: lightweight markup with sanitized HTML rendering
//! - [`specifics`]: URL-encoded typed parameter bag

pub mod answer;
pub mod file_location;
pub mod filename;
pub mod markup;
pub mod number;
pub mod specifics;

use crate::dictionary::types::diagnostics::Diagnostic;

/// Result of running a value through a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub value: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Correction {
    /// The input was already valid.
    pub fn valid(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            diagnostics: Vec::new(),
        }
    }

    /// The input was replaced by `value`.
    pub fn corrected(value: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            value: value.into(),
            diagnostics: vec![diagnostic],
        }
    }

    /// The input could not be salvaged.
    pub fn dropped(diagnostic: Diagnostic) -> Self {
        Self {
            value: String::new(),
            diagnostics: vec![diagnostic],
        }
    }

    pub fn is_dropped(&self) -> bool {
        self.value.is_empty()
    }
}
