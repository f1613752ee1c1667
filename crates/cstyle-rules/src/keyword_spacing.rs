//! Rule requiring a space between a control keyword and its condition.
//!
//! # Rationale
//!
//! `if(x)` reads like a function call. Separating the keyword from its
//! parenthesis keeps control flow visually distinct from calls.
//!
//! # Detected Patterns
//!
//! - `if(`, `while(`, `for(`, `switch(` with nothing in between
//!
//! # Suppression
//!
//! - `// cstyle: allow(keyword-spacing)` comment

use cstyle_core::{FileContext, Rule, SourceFile, Violation};

/// Rule code for keyword-spacing.
pub const CODE: &str = "CS001";

/// Rule name for keyword-spacing.
pub const NAME: &str = "keyword-spacing";

/// Requires whitespace between a control keyword and `(`.
#[derive(Debug, Clone, Default)]
pub struct KeywordSpacing;

impl KeywordSpacing {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for KeywordSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a space between a control keyword and its condition"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        file.tokens
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].is_control_keyword() && pair[1].is_punct("("))
            .map(|(i, pair)| {
                ctx.violation(
                    self,
                    file,
                    i,
                    format!("missing space between `{}` and `(`", pair[0].text),
                )
            })
            .collect()
    }
}
