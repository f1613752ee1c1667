//! Diagnostic model shared by the engine and reporters.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Severity level for style violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style issue that should be addressed.
    Warning,
    /// Style issue that fails the run.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analyzed root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A style violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "CS001").
    pub code: String,
    /// Rule name (e.g., "keyword-spacing").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Orders violations by file, line, then column.
    ///
    /// Violations at the same position compare equal; a stable sort keeps
    /// them in rule registration order.
    #[must_use]
    pub fn cmp_location(&self, other: &Self) -> Ordering {
        self.location
            .file
            .cmp(&other.location.file)
            .then(self.location.line.cmp(&other.location.line))
            .then(self.location.column.cmp(&other.location.column))
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[label(collection)]
    related: Vec<miette::LabeledSpan>,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
            related: v
                .labels
                .iter()
                .map(|l| {
                    miette::LabeledSpan::new(
                        Some(l.message.clone()),
                        l.location.offset,
                        l.location.length,
                    )
                })
                .collect(),
        }
    }
}

/// Result of running style analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }

    /// Sorts violations by location, keeping the order of ties.
    pub fn sort(&mut self) {
        self.violations.sort_by(Violation::cmp_location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity, line: usize, column: usize) -> Violation {
        Violation::new(
            "CS001",
            "keyword-spacing",
            severity,
            Location::new(PathBuf::from("src/main.c"), line, column),
            "missing space between `if` and `(`",
        )
    }

    #[test]
    fn violation_display() {
        let v = make_violation(Severity::Error, 20, 3);
        assert_eq!(
            v.to_string(),
            "src/main.c:20:3: error [CS001] missing space between `if` and `(`"
        );
    }

    #[test]
    fn violation_format_includes_suggestion() {
        let v = make_violation(Severity::Error, 1, 1)
            .with_suggestion(Suggestion::new("write `if (`"));
        let formatted = v.format();
        assert!(formatted.starts_with("CS001 keyword-spacing at src/main.c:1:1"));
        assert!(formatted.contains("= help: write `if (`"));
    }

    #[test]
    fn severity_orders_warning_below_error() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning, 1, 1));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn sort_is_stable_for_same_location() {
        let mut result = LintResult::new();
        let mut first = make_violation(Severity::Error, 2, 1);
        first.rule = "first".into();
        let mut second = make_violation(Severity::Error, 2, 1);
        second.rule = "second".into();
        result.violations = vec![first, make_violation(Severity::Error, 1, 5), second];
        result.sort();

        let order: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.location.line, v.rule.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(1, "keyword-spacing"), (2, "first"), (2, "second")]
        );
    }

    #[test]
    fn count_by_severity() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning, 1, 1));
        result.violations.push(make_violation(Severity::Error, 2, 1));
        result.violations.push(make_violation(Severity::Error, 3, 1));
        assert_eq!(result.count_by_severity(), (2, 1));
        assert_eq!(result.by_severity(Severity::Warning).len(), 1);
    }
}
