//! Rule flagging leftover `TODO` comments.

use cstyle_core::{FileContext, ModeSet, Rule, Severity, SourceFile, Violation};

/// Rule code for todo-comment.
pub const CODE: &str = "CS009";

/// Rule name for todo-comment.
pub const NAME: &str = "todo-comment";

/// Flags comments whose text begins with `TODO`.
#[derive(Debug, Clone, Default)]
pub struct TodoComment;

impl TodoComment {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TodoComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags comments left in as TODO notes"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn modes(&self) -> ModeSet {
        ModeSet::STRICT
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        file.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind.is_comment())
            .filter(|(_, t)| comment_text(t.text).starts_with("TODO"))
            .map(|(i, _)| ctx.violation(self, file, i, "TODO comment left in code"))
            .collect()
    }
}

/// Comment text without its delimiters and surrounding whitespace.
pub(crate) fn comment_text(comment: &str) -> &str {
    let body = match comment.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let rest = comment.strip_prefix("/*").unwrap_or(comment);
            rest.strip_suffix("*/").unwrap_or(rest)
        }
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<usize> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        TodoComment::new()
            .check(&ctx, &file)
            .iter()
            .map(|v| v.location.line)
            .collect()
    }

    #[test]
    fn test_detects_todo_comments() {
        let code = "// TODO: remove\nint x; /* TODO */\n//TODO\n";
        assert_eq!(check_code(code), vec![1, 2, 3]);
    }

    #[test]
    fn test_todo_elsewhere_in_text_passes() {
        assert!(check_code("// remove the TODO list\nint todo;\n").is_empty());
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("//  hello "), "hello");
        assert_eq!(comment_text("/* a\n * b */"), "a\n * b");
        assert_eq!(comment_text("/* open"), "open");
    }
}
