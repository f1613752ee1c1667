//! Rule forbidding trailing whitespace, including whitespace-only lines.

use cstyle_core::{FileContext, ModeSet, Rule, Severity, SourceFile, Violation};

/// Rule code for trailing-whitespace.
pub const CODE: &str = "CS008";

/// Rule name for trailing-whitespace.
pub const NAME: &str = "trailing-whitespace";

/// Flags spaces and tabs at the end of a line.
#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespace;

impl TrailingWhitespace {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids whitespace at the end of a line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn modes(&self) -> ModeSet {
        ModeSet::STRICT
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        file.lines()
            .filter_map(|(line, text)| {
                let kept = text.trim_end_matches(|c: char| c == ' ' || c == '\t');
                if kept.len() == text.len() {
                    return None;
                }
                let message = if kept.is_empty() {
                    "whitespace on an empty line"
                } else {
                    "trailing whitespace"
                };
                Some(Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    ctx.location_at(line, kept.chars().count() + 1),
                    message,
                ))
            })
            .collect()
    }
}
