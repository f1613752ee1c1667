//! Comment-based suppression directives.
//!
//! Supports directives like:
//! ```text
//! // cstyle: allow(magic-literal) reason="wire protocol constant"
//! x = 42; /* cstyle: allow(magic-literal, line-length) */
//! ```
//!
//! A directive covers its own line and the line after it. `all` covers
//! every rule.

use crate::syntax::SourceFile;
use std::collections::HashSet;

/// Parsed suppression directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Line the directive comment ends on.
    pub line: usize,
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, line: usize, rule_name: &str) -> bool {
        (line == self.line || line == self.line + 1)
            && (self.rules.contains(rule_name) || self.rules.contains("all"))
    }
}

/// All suppression directives of one file.
#[derive(Debug, Clone, Default)]
pub struct Allowances {
    directives: Vec<AllowDirective>,
}

impl Allowances {
    /// Collects the directives found in the file's comments.
    #[must_use]
    pub fn collect(file: &SourceFile) -> Self {
        let directives = file
            .tokens
            .iter()
            .filter(|t| t.kind.is_comment())
            .filter_map(|t| {
                let (rules, reason) = parse_allow_directive(t.text)?;
                Some(AllowDirective {
                    line: t.end_line(),
                    rules,
                    reason,
                })
            })
            .collect();
        Self { directives }
    }

    /// Returns true if no directive was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Returns the directive allowing `rule_name` on `line`, if any.
    #[must_use]
    pub fn find(&self, line: usize, rule_name: &str) -> Option<&AllowDirective> {
        self.directives.iter().find(|d| d.covers(line, rule_name))
    }

    /// Returns true if `rule_name` is allowed on `line`.
    #[must_use]
    pub fn is_allowed(&self, line: usize, rule_name: &str) -> bool {
        self.find(line, rule_name).is_some()
    }
}

/// Parses a directive from the full text of a comment token.
fn parse_allow_directive(comment: &str) -> Option<(HashSet<String>, Option<String>)> {
    let body = if let Some(rest) = comment.strip_prefix("//") {
        rest
    } else {
        let rest = comment.strip_prefix("/*")?;
        rest.strip_suffix("*/").unwrap_or(rest)
    };

    let directive = body.trim().strip_prefix("cstyle:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some((rules, reason))
}
