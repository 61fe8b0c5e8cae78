//! Per-call capabilities.

use super::collab::Collaborators;
use super::types::diagnostics::Diagnostics;

/// Collaborators and the diagnostics sink one parse or serialize call runs
/// with. Passed explicitly as `&mut Context`.
#[derive(Debug, Default)]
pub struct Context {
    pub collaborators: Collaborators,
    pub diagnostics: Diagnostics,
}

impl Context {
    /// A context with the default collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collaborators(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            diagnostics: Diagnostics::new(),
        }
    }
}
