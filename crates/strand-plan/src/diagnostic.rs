//! Plan diagnostics
//!
//! Rules never return early on a problem; they record a [`Diagnostic`] and
//! the plan pass decides at the end whether planning failed.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::path::AttributePath;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Blocks apply
    Error,

    /// Informational
    Warning,
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Length, minimum or alphabet constraint violated
    InvalidSpec,

    /// Aliased attributes configured with different values
    InconsistentConfiguration,

    /// A required attribute is unset
    MissingRequired,

    /// A deprecated attribute is in use
    Deprecated,
}

/// One plan-time finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,

    /// Category
    pub kind: DiagnosticKind,

    /// Attribute concerned, if any
    pub path: Option<AttributePath>,

    /// Short summary
    pub summary: String,

    /// Full explanation
    pub detail: String,
}

impl Diagnostic {
    /// Create an error diagnostic
    #[inline]
    #[must_use]
    pub fn error(
        kind: DiagnosticKind,
        path: Option<AttributePath>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            path,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Create a warning diagnostic
    #[inline]
    #[must_use]
    pub fn warning(
        kind: DiagnosticKind,
        path: Option<AttributePath>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            path,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Check severity
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.path {
            Some(path) => write!(f, "{level} at {path}: {}: {}", self.summary, self.detail),
            None => write!(f, "{level}: {}: {}", self.summary, self.detail),
        }
    }
}

/// Ordered, de-duplicated diagnostic list
///
/// Two rules reporting the same finding (both halves of an alias pair, for
/// instance) produce one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append unless an identical diagnostic is present
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if !self.0.contains(&diagnostic) {
            self.0.push(diagnostic);
        }
    }

    /// Append all of `other`
    pub fn extend(&mut self, other: Diagnostics) {
        for diagnostic in other.0 {
            self.push(diagnostic);
        }
    }

    /// Check for any error
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    /// Check for an error of `kind`
    #[inline]
    #[must_use]
    pub fn has_error_kind(&self, kind: DiagnosticKind) -> bool {
        self.0.iter().any(|d| d.is_error() && d.kind == kind)
    }

    /// Errors only
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    /// Warnings only
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }

    /// All diagnostics
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Number of diagnostics
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
