//! Context types for rule execution.

use crate::config::StyleConfig;
use crate::engine::{ENGINE_WARNING_CODE, ENGINE_WARNING_NAME};
use crate::rule::{Mode, Rule};
use crate::syntax::{SourceFile, TokenIdx};
use crate::types::{Location, Severity, Violation};
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Carries everything about the file that is not part of its syntax:
/// where it lives, the active mode, and the layout settings.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the analyzed root.
    pub relative_path: PathBuf,
    /// Active checking mode.
    pub mode: Mode,
    /// Layout settings.
    pub style: StyleConfig,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
            mode: Mode::default(),
            style: StyleConfig::default(),
        }
    }

    /// Sets the checking mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the layout settings.
    #[must_use]
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Location of the token at `idx`.
    #[must_use]
    pub fn location(&self, file: &SourceFile, idx: TokenIdx) -> Location {
        let span = file.token(idx).span;
        Location::new(self.relative_path.clone(), span.line, span.column)
            .with_span(span.offset, span.len)
    }

    /// Location of a 1-indexed line and column.
    #[must_use]
    pub fn location_at(&self, line: usize, column: usize) -> Location {
        Location::new(self.relative_path.clone(), line, column)
            .with_span(self.offset_for(line, column), 1)
    }

    /// Creates a violation of `rule` at the token `idx`.
    #[must_use]
    pub fn violation<R: Rule + ?Sized>(
        &self,
        rule: &R,
        file: &SourceFile,
        idx: TokenIdx,
        message: impl Into<String>,
    ) -> Violation {
        Violation::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            self.location(file, idx),
            message,
        )
    }

    /// Creates the warning a rule emits when it skips a malformed node.
    #[must_use]
    pub fn engine_warning(
        &self,
        rule_name: &str,
        file: &SourceFile,
        idx: TokenIdx,
        message: impl std::fmt::Display,
    ) -> Violation {
        Violation::new(
            ENGINE_WARNING_CODE,
            ENGINE_WARNING_NAME,
            Severity::Warning,
            self.location(file, idx),
            format!("{rule_name}: {message}"),
        )
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// Columns are counted in characters. Returns the end of the content if
    /// the line is out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split('\n').enumerate() {
            if i + 1 == line {
                let within = line_content
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_content.len(), |(at, _)| at);
                return offset + within;
            }
            offset += line_content.len() + 1;
        }

        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(Path::new("/proj/src/main.c"), "", Path::new("/proj"));
        assert_eq!(ctx.relative_path, PathBuf::from("src/main.c"));

        let single = FileContext::new(Path::new("main.c"), "", Path::new("main.c"));
        assert_eq!(single.relative_path, PathBuf::from("main.c"));
    }

    #[test]
    fn test_offset_calculation() {
        let ctx = FileContext::new(Path::new("t.c"), "line1\nl\u{e9}ne2\nline3", Path::new("."));

        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 6);
        assert_eq!(ctx.offset_for(2, 3), 9);
        assert_eq!(ctx.offset_for(9, 1), ctx.content.len());
    }

    #[test]
    fn test_token_location() {
        let content = "int x;\n  y = 2;\n";
        let file = SourceFile::parse(content);
        let ctx = FileContext::new(Path::new("a.c"), content, Path::new("."));
        let y = file.tokens.iter().position(|t| t.text == "y").unwrap_or(0);
        let loc = ctx.location(&file, y);
        assert_eq!((loc.line, loc.column, loc.offset, loc.length), (2, 3, 9, 1));
    }

    #[test]
    fn test_engine_warning() {
        let file = SourceFile::parse("if");
        let ctx = FileContext::new(Path::new("a.c"), "if", Path::new("."));
        let warning = ctx.engine_warning("brace-placement", &file, 0, "condition is not closed");
        assert_eq!(warning.code, ENGINE_WARNING_CODE);
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.message, "brace-placement: condition is not closed");
    }
}
