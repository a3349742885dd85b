//! Diagnostics for recoverable resolution problems
//!
//! Nothing in the cascade or the numbering engine aborts a document. Broken
//! references and cycles degrade gracefully and are reported here instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A style id (`styleId` or `basedOnId`) did not resolve
pub const UNRESOLVED_STYLE: &str = "W001";
/// A basedOn chain loops back on itself
pub const BASED_ON_CYCLE: &str = "W002";
/// A numbering reference has no matching level definition
pub const MISSING_NUMBERING_LEVEL: &str = "W003";

/// A diagnostic message
///
/// # Example
///
/// ```
/// use docweave_core::diagnostics::{Diagnostic, Severity, BASED_ON_CYCLE};
///
/// let diag = Diagnostic::warning(BASED_ON_CYCLE, "style 'A' is based on itself");
/// assert_eq!(diag.severity, Severity::Warning);
/// assert_eq!(diag.to_string(), "warning[W002]: style 'A' is based on itself");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Diagnostic code (e.g. "W001")
    pub code: String,
    /// The message
    pub message: String,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Something was ignored or degraded
    Warning,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an info diagnostic
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
    }

    #[test]
    fn test_serialize() {
        let diag = Diagnostic::info(UNRESOLVED_STYLE, "missing");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "info");
        assert_eq!(json["code"], "W001");
    }
}
