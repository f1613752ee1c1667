//! Rule flagging code that was commented out instead of deleted.
//!
//! # Detected Patterns
//!
//! A `//` comment whose text
//!
//! - ends with `;`, `{` or `}`
//! - starts with a control keyword and a parenthesis (`if (`, `while(`)
//! - is a preprocessor directive (`#include`, `#define`, ...)

use crate::todo_comment::comment_text;
use cstyle_core::syntax::token::CONTROL_KEYWORDS;
use cstyle_core::syntax::TokenKind;
use cstyle_core::{FileContext, ModeSet, Rule, Severity, SourceFile, Violation};

/// Rule code for commented-out-code.
pub const CODE: &str = "CS010";

/// Rule name for commented-out-code.
pub const NAME: &str = "commented-out-code";

const DIRECTIVES: &[&str] = &[
    "define", "include", "undef", "ifdef", "ifndef", "if", "else", "elif", "endif", "error",
    "pragma",
];

/// Flags line comments that contain C code.
#[derive(Debug, Clone, Default)]
pub struct CommentedOutCode;

impl CommentedOutCode {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CommentedOutCode {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags line comments that contain commented-out code"
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
            .filter(|(_, t)| t.kind == TokenKind::LineComment)
            .filter(|(_, t)| looks_like_code(comment_text(t.text)))
            .map(|(i, _)| ctx.violation(self, file, i, "commented-out code"))
            .collect()
    }
}

fn looks_like_code(text: &str) -> bool {
    if text.ends_with(';') || text.ends_with('{') || text.ends_with('}') {
        return true;
    }
    if let Some(directive) = text.strip_prefix('#') {
        let word = directive.trim_start().split_whitespace().next().unwrap_or("");
        return DIRECTIVES.contains(&word);
    }
    CONTROL_KEYWORDS.iter().any(|kw| {
        text.strip_prefix(kw)
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<usize> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        CommentedOutCode::new()
            .check(&ctx, &file)
            .iter()
            .map(|v| v.location.line)
            .collect()
    }

    #[test]
    fn test_detects_code() {
        let code = "// x = 1;\n// if (x) {\n//while(y)\n// }\n// #include <stdio.h>\n";
        assert_eq!(check_code(code), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_prose_passes() {
        let code = "// This if statement does not use curly braces\n// if the value is set\n// iffy(\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_block_comments_are_ignored() {
        assert!(check_code("/* x = 1; */\n").is_empty());
    }
}
