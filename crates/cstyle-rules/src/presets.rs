//! Rule presets for the checking modes.

use crate::{
    excess_blank_lines, line_length, magic_literal, BraceLineBreak, BracePlacement,
    CommentedOutCode, ExcessBlankLines, Indentation, KeywordSpacing, LineLength, MagicLiteral,
    MissingBraces, TodoComment, TrailingWhitespace,
};
use cstyle_core::{Config, Mode, RuleBox};
use tracing::debug;

/// Preset rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Layout rules only.
    Normal,
    /// Layout rules plus the strict-only rules.
    Strict,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Normal => normal_rules(),
            Self::Strict => strict_rules(),
        }
    }
}

impl From<Mode> for Preset {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Normal => Self::Normal,
            Mode::Strict => Self::Strict,
        }
    }
}

/// Returns the rules active in normal mode.
///
/// Includes:
/// - `keyword-spacing` (CS001)
/// - `brace-placement` (CS002)
/// - `missing-braces` (CS003)
/// - `indentation` (CS004)
/// - `line-length` (CS005)
/// - `excess-blank-lines` (CS006)
#[must_use]
pub fn normal_rules() -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .filter(|rule| rule.modes().contains(Mode::Normal))
        .collect()
}

/// Returns the rules active in strict mode.
///
/// Includes all normal rules plus:
/// - `magic-literal` (CS007)
/// - `trailing-whitespace` (CS008)
/// - `todo-comment` (CS009)
/// - `commented-out-code` (CS010)
/// - `brace-line-break` (CS011)
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .filter(|rule| rule.modes().contains(Mode::Strict))
        .collect()
}

/// Returns every built-in rule with default options, in code order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(KeywordSpacing::new()),
        Box::new(BracePlacement::new()),
        Box::new(MissingBraces::new()),
        Box::new(Indentation::new()),
        Box::new(LineLength::new()),
        Box::new(ExcessBlankLines::new()),
        Box::new(MagicLiteral::new()),
        Box::new(TrailingWhitespace::new()),
        Box::new(TodoComment::new()),
        Box::new(CommentedOutCode::new()),
        Box::new(BraceLineBreak::new()),
    ]
}

/// Returns every built-in rule with options taken from `[rules.<name>]`.
///
/// Rules are not filtered here; the engine drops disabled rules and rules
/// outside the active mode.
#[must_use]
pub fn configured_rules(config: &Config) -> Vec<RuleBox> {
    let options = |name: &str| config.rule_config(name).cloned().unwrap_or_default();

    let max_width = options(line_length::NAME).get_usize("max", line_length::DEFAULT_MAX);
    let max_blank =
        options(excess_blank_lines::NAME).get_usize("max", excess_blank_lines::DEFAULT_MAX);
    let allow = options(magic_literal::NAME).get_str_array("allow");
    if !allow.is_empty() {
        debug!("magic-literal: {} extra allowed literals", allow.len());
    }

    vec![
        Box::new(KeywordSpacing::new()),
        Box::new(BracePlacement::new()),
        Box::new(MissingBraces::new()),
        Box::new(Indentation::new()),
        Box::new(LineLength::new().max(max_width)),
        Box::new(ExcessBlankLines::new().max(max_blank)),
        Box::new(MagicLiteral::new().allow(allow)),
        Box::new(TrailingWhitespace::new()),
        Box::new(TodoComment::new()),
        Box::new(CommentedOutCode::new()),
        Box::new(BraceLineBreak::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::{FileContext, SourceFile};
    use std::path::Path;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_strict_is_superset_of_normal() {
        let normal = names(&normal_rules());
        let strict = names(&strict_rules());
        assert_eq!(normal.len(), 6);
        assert_eq!(strict.len(), 11);
        assert!(normal.iter().all(|n| strict.contains(n)));
        assert_eq!(names(&Preset::from(Mode::Strict).rules()), strict);
    }

    #[test]
    fn test_codes_are_unique_and_ordered() {
        let codes: Vec<_> = all_rules().iter().map(|r| r.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_configured_rules_read_options() {
        let config = Config::parse(
            r#"
[rules.line-length]
max = 100

[rules.magic-literal]
allow = ["42"]
"#,
        )
        .expect("valid config");
        let rules = configured_rules(&config);
        assert_eq!(names(&rules), names(&all_rules()));

        let code = format!("int x; /*{}*/\n", "-".repeat(80));
        let file = SourceFile::parse(&code);
        let ctx = FileContext::new(Path::new("t.c"), &code, Path::new("."));
        let check = |rules: &[RuleBox]| {
            rules
                .iter()
                .filter(|r| r.name() == line_length::NAME)
                .flat_map(|r| r.check(&ctx, &file))
                .count()
        };
        assert_eq!(check(&all_rules()), 1);
        assert_eq!(check(&rules), 0);
    }
}
