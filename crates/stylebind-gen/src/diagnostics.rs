//! Diagnostic records collected across one generation pass.
//!
//! Failures never abort the pass: each offending declaration is excluded and
//! reported, and all records surface together when the pass concludes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Excludes the offending declaration from generation.
    Error,
    /// Informational trace, e.g. a symbolic-recovery fallback.
    Note,
}

/// One diagnostic, attributed to the offending declaration.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// `owner::module::Type.field` style attribution.
    pub location: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Note => "note",
        };
        write!(f, "{tag}: {} ({})", self.message, self.location)
    }
}

/// Sink for the pass's diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.records.push(Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            location: location.into(),
        });
    }

    pub fn note(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.records.push(Diagnostic {
            severity: Severity::Note,
            message: message.into(),
            location: location.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|r| r.severity == Severity::Error)
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|r| r.severity == Severity::Error)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|r| r.severity == Severity::Note)
    }
}
