//! Leveled diagnostics collected while parsing and serializing.
//!
//! Validators return their diagnostics by value; the model, parsers and
//! serializers push them into a [`Diagnostics`] collector handed to them
//! through [`Context`](crate::dictionary::Context). Every entry is also
//! forwarded to the `log` facade.

use std::fmt;

/// Severity of a diagnostic, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Notice,
    Info,
}

impl Severity {
    fn log_level(self) -> log::Level {
        match self {
            Severity::Critical | Severity::Error => log::Level::Error,
            Severity::Warning => log::Level::Warn,
            Severity::Notice | Severity::Info => log::Level::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(Severity::Notice, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Append-only collector of diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::log!(diagnostic.severity.log_level(), "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for d in diagnostics {
            self.push(d);
        }
    }

    pub fn critical(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Critical, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::error(message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::warning(message));
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::notice(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Info, message));
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries at exactly the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// Whether any entry is at least as severe as `severity`.
    pub fn has_at_least(&self, severity: Severity) -> bool {
        self.entries.iter().any(|d| d.severity <= severity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
