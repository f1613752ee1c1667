//! Rule limiting runs of blank lines.
//!
//! # Configuration
//!
//! - `max`: Maximum number of consecutive blank lines (default: 2). A line
//!   holding only spaces or tabs counts as blank. Lines inside a
//!   multi-line comment, literal or directive never do.

use cstyle_core::syntax::TokenKind;
use cstyle_core::{FileContext, Rule, Severity, SourceFile, Violation};
use std::collections::HashSet;

/// Rule code for excess-blank-lines.
pub const CODE: &str = "CS006";

/// Rule name for excess-blank-lines.
pub const NAME: &str = "excess-blank-lines";

/// Default maximum run of blank lines.
pub const DEFAULT_MAX: usize = 2;

/// Flags runs of more than `max` consecutive blank lines.
#[derive(Debug, Clone)]
pub struct ExcessBlankLines {
    max: usize,
}

impl Default for ExcessBlankLines {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcessBlankLines {
    /// Creates a new rule with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self { max: DEFAULT_MAX }
    }

    /// Sets the maximum run of blank lines.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    fn report(&self, ctx: &FileContext, start: usize, len: usize) -> Option<Violation> {
        (len > self.max).then(|| {
            Violation::new(
                CODE,
                NAME,
                self.default_severity(),
                ctx.location_at(start, 1),
                format!(
                    "{len} consecutive blank lines, more than the limit of {}",
                    self.max
                ),
            )
        })
    }
}

impl Rule for ExcessBlankLines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits consecutive blank lines"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let covered = covered_lines(file);
        let mut violations = Vec::new();
        let mut run: Option<(usize, usize)> = None;

        for (line, text) in file.lines() {
            if text.trim().is_empty() && !covered.contains(&line) {
                let (start, len) = run.unwrap_or((line, 0));
                run = Some((start, len + 1));
            } else if let Some((start, len)) = run.take() {
                violations.extend(self.report(ctx, start, len));
            }
        }
        if let Some((start, len)) = run {
            violations.extend(self.report(ctx, start, len));
        }

        violations
    }
}

/// Lines strictly inside a token that spans several lines.
fn covered_lines(file: &SourceFile) -> HashSet<usize> {
    file.tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .flat_map(|t| t.line() + 1..t.end_line())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_with(rule: &ExcessBlankLines, code: &str) -> Vec<(usize, String)> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        rule.check(&ctx, &file)
            .into_iter()
            .map(|v| (v.location.line, v.message))
            .collect()
    }

    #[test]
    fn test_two_blank_lines_pass() {
        assert!(check_with(&ExcessBlankLines::new(), "a;\n\n\nb;\n").is_empty());
    }

    #[test]
    fn test_detects_long_run() {
        let found = check_with(&ExcessBlankLines::new(), "a;\n\n  \n\t\nb;\n\n\n\n\n");
        assert_eq!(
            found,
            vec![
                (2, "3 consecutive blank lines, more than the limit of 2".to_string()),
                (6, "4 consecutive blank lines, more than the limit of 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_configured_max() {
        assert_eq!(check_with(&ExcessBlankLines::new().max(0), "a;\n\nb;\n").len(), 1);
    }

    #[test]
    fn test_blank_lines_inside_comment_pass() {
        let code = "/* header\n\n\n\n   end */\nint x;\n";
        assert!(check_with(&ExcessBlankLines::new(), code).is_empty());
    }

    #[test]
    fn test_comment_splits_runs() {
        let code = "a;\n\n\n/*\n\n\n*/\n\n\nb;\n";
        assert!(check_with(&ExcessBlankLines::new(), code).is_empty());
        let code = "a;\n\n\n\n/* x */\nb;\n";
        assert_eq!(check_with(&ExcessBlankLines::new(), code).len(), 1);
    }
}
