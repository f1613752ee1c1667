//! Rule limiting line width.
//!
//! # Configuration
//!
//! - `max`: Maximum visual width of a line (default: 80). Tabs count as
//!   `style.tab_width` columns.

use cstyle_core::{FileContext, Rule, Severity, SourceFile, Violation};

/// Rule code for line-length.
pub const CODE: &str = "CS005";

/// Rule name for line-length.
pub const NAME: &str = "line-length";

/// Default maximum line width.
pub const DEFAULT_MAX: usize = 80;

/// Flags lines wider than a fixed number of columns.
#[derive(Debug, Clone)]
pub struct LineLength {
    max: usize,
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLength {
    /// Creates a new rule with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self { max: DEFAULT_MAX }
    }

    /// Sets the maximum line width.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }
}

impl Rule for LineLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits lines to a maximum width"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let tab_width = ctx.style.tab_width;
        let mut violations = Vec::new();

        for (line, text) in file.lines() {
            let mut width = 0;
            let mut overflow = None;
            for (i, c) in text.chars().enumerate() {
                width += if c == '\t' { tab_width } else { 1 };
                if width > self.max && overflow.is_none() {
                    overflow = Some(i + 1);
                }
            }
            if let Some(column) = overflow {
                violations.push(Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location_at(line, column),
                    format!("line is {width} columns wide, exceeding the limit of {}", self.max),
                ));
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_with(rule: &LineLength, code: &str) -> Vec<Violation> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        rule.check(&ctx, &file)
    }

    #[test]
    fn test_limit_is_inclusive() {
        let code = format!("{}\n{}\n", "a".repeat(80), "b".repeat(81));
        let violations = check_with(&LineLength::new(), &code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);
        assert_eq!(violations[0].location.column, 81);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(
            violations[0].message,
            "line is 81 columns wide, exceeding the limit of 80"
        );
    }

    #[test]
    fn test_tabs_count_as_tab_width() {
        let code = "\t\tabcdef\n";
        let violations = check_with(&LineLength::new().max(8), code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.column, 7);
    }

    #[test]
    fn test_short_lines_pass() {
        assert!(check_with(&LineLength::new(), "int x;\n\nint y;\n").is_empty());
    }
}
