//! Diagnostic reporting for parse and resolution results.
//!
//! The resolver never writes to stderr itself; every recoverable skip and
//! every fatal condition is pushed into a [`Report`] owned by the caller.

use std::fmt;
use std::path::{Path, PathBuf};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single parse/resolution diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Machine-readable diagnostic code (e.g. "scenedoc::unresolved-scene").
    pub code: String,
    /// The file the diagnostic refers to, when known.
    pub path: Option<PathBuf>,
    /// Human-readable message.
    pub message: String,
    /// The raw field value that triggered the diagnostic (an unresolved
    /// uid/path, a duplicate local id), when available.
    pub detail: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            path: None,
            message: message.into(),
            detail: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            path: None,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach the file path the diagnostic refers to.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Attach the offending raw field value.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Collects diagnostics across a whole run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Count errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Count warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are no diagnostics at all.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: Report) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Print a report to stderr.
pub fn print_report(report: &Report) {
    for d in report.iter() {
        match &d.path {
            Some(path) => eprintln!("  {}[{}] {}: {}", d.severity, d.code, path.display(), d.message),
            None => eprintln!("  {}[{}]: {}", d.severity, d.code, d.message),
        }
        if let Some(detail) = &d.detail {
            eprintln!("    value: {}", detail);
        }
    }

    let errors = report.error_count();
    let warnings = report.warning_count();

    if errors > 0 {
        eprintln!("Resolution finished: {} error(s), {} warning(s)", errors, warnings);
    } else if warnings > 0 {
        eprintln!("Resolution finished ({} warning(s))", warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(report.is_ok());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_error_diagnostic() {
        let mut report = Report::new();
        report.push(Diagnostic::error("scenedoc::test", "something broke"));

        assert!(report.has_errors());
        assert!(!report.has_warnings());
        assert!(!report.is_ok());
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_warning_diagnostic() {
        let mut report = Report::new();
        report.push(Diagnostic::warning("scenedoc::test", "something looks off"));

        assert!(!report.has_errors());
        assert!(report.has_warnings());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_merge() {
        let mut a = Report::new();
        a.push(Diagnostic::error("scenedoc::a", "error a"));

        let mut b = Report::new();
        b.push(Diagnostic::warning("scenedoc::b", "warning b"));

        a.merge(b);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
    }

    #[test]
    fn test_diagnostic_with_context() {
        let d = Diagnostic::warning("scenedoc::unresolved-scene", "previously not encountered scene")
            .with_path("levels/Hub.tscn")
            .with_detail("uid://missing");
        assert_eq!(d.path.as_deref(), Some(std::path::Path::new("levels/Hub.tscn")));
        assert_eq!(d.detail.as_deref(), Some("uid://missing"));
    }
}
