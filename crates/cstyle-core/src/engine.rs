//! Per-file rule evaluation.

use crate::allowance::Allowances;
use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{Mode, Rule, RuleBox};
use crate::syntax::{LexError, SourceFile, StructureError};
use crate::types::{Location, Severity, Violation};
use tracing::debug;

/// Code of diagnostics for unterminated literals and comments.
pub const LEX_ERROR_CODE: &str = "CS900";
/// Name of diagnostics for unterminated literals and comments.
pub const LEX_ERROR_NAME: &str = "lex-error";
/// Code of diagnostics for unbalanced structure.
pub const STRUCTURE_ERROR_CODE: &str = "CS901";
/// Name of diagnostics for unbalanced structure.
pub const STRUCTURE_ERROR_NAME: &str = "structure-error";
/// Code of diagnostics for nodes a rule had to skip.
pub const ENGINE_WARNING_CODE: &str = "CS902";
/// Name of diagnostics for nodes a rule had to skip.
pub const ENGINE_WARNING_NAME: &str = "engine-warning";

/// Evaluates a fixed, ordered rule registry against single files.
///
/// The registry order is significant: diagnostics at the same position are
/// reported in the order their rules were registered.
pub struct Engine {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Engine {
    /// Creates an engine over `rules` in registration order.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>, config: Config) -> Self {
        Self { rules, config }
    }

    /// All registered rules.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// The configuration the engine filters and overrides with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rules that run in `mode` and are not disabled by configuration.
    pub fn active_rules(&self, mode: Mode) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules
            .iter()
            .map(AsRef::as_ref)
            .filter(move |rule| rule.modes().contains(mode))
            .filter(move |rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
    }

    /// Lexes, resolves and checks one file's content.
    #[must_use]
    pub fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let file = SourceFile::parse(ctx.content);
        self.evaluate(ctx, &file)
    }

    /// Evaluates the active rules against an already parsed file.
    ///
    /// Violations covered by a `cstyle: allow(...)` comment are dropped.
    /// The result is sorted by line and column; lexical and structural
    /// errors come first among diagnostics at the same position.
    #[must_use]
    pub fn evaluate(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let mut violations: Vec<Violation> = file
            .lex_errors
            .iter()
            .map(|err| lex_violation(ctx, err))
            .collect();
        violations.extend(
            file.structure_errors
                .iter()
                .map(|err| structure_violation(ctx, file, err)),
        );

        for rule in self.active_rules(ctx.mode) {
            let found = rule.check(ctx, file);
            debug!(
                "{}: {} reported {}",
                ctx.relative_path.display(),
                rule.name(),
                found.len()
            );
            violations.extend(found);
        }

        let allowances = Allowances::collect(file);
        if !allowances.is_empty() {
            violations.retain(|v| !allowances.is_allowed(v.location.line, &v.rule));
        }

        for v in &mut violations {
            if let Some(severity) = self.config.rule_severity(&v.rule) {
                v.severity = severity;
            }
        }

        violations.sort_by(Violation::cmp_location);
        violations
    }
}

fn lex_violation(ctx: &FileContext, err: &LexError) -> Violation {
    let span = err.span();
    Violation::new(
        LEX_ERROR_CODE,
        LEX_ERROR_NAME,
        Severity::Error,
        Location::new(ctx.relative_path.clone(), span.line, span.column)
            .with_span(span.offset, span.len),
        err.to_string(),
    )
}

fn structure_violation(ctx: &FileContext, file: &SourceFile, err: &StructureError) -> Violation {
    Violation::new(
        STRUCTURE_ERROR_CODE,
        STRUCTURE_ERROR_NAME,
        Severity::Error,
        ctx.location(file, err.token()),
        err.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ModeSet;
    use crate::syntax::TokenKind;
    use std::path::Path;

    /// Flags every identifier named `bad`.
    struct BadName;

    impl Rule for BadName {
        fn name(&self) -> &'static str {
            "bad-name"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
            file.tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| t.kind == TokenKind::Identifier && t.text == "bad")
                .map(|(i, _)| ctx.violation(self, file, i, "bad name"))
                .collect()
        }
    }

    /// Flags the first token of every line, strict mode only.
    struct LineStart;

    impl Rule for LineStart {
        fn name(&self) -> &'static str {
            "line-start"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn modes(&self) -> ModeSet {
            ModeSet::STRICT
        }
        fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
            (0..file.tokens.len())
                .filter(|&i| file.tokens[i].kind != TokenKind::Whitespace)
                .filter(|&i| file.is_line_leading(i))
                .map(|i| ctx.violation(self, file, i, "line start"))
                .collect()
        }
    }

    fn engine(config: Config) -> Engine {
        Engine::new(vec![Box::new(LineStart), Box::new(BadName)], config)
    }

    fn summary(violations: &[Violation]) -> Vec<(usize, usize, String)> {
        violations
            .iter()
            .map(|v| (v.location.line, v.location.column, v.rule.clone()))
            .collect()
    }

    fn check(engine: &Engine, src: &str, mode: Mode) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("t.c"), src, Path::new(".")).with_mode(mode);
        engine.check(&ctx)
    }

    #[test]
    fn test_mode_filters_rules() {
        let engine = engine(Config::default());
        let normal = check(&engine, "bad = 1;\n", Mode::Normal);
        assert_eq!(summary(&normal), vec![(1, 1, "bad-name".to_string())]);
    }

    #[test]
    fn test_ties_follow_registration_order() {
        let engine = engine(Config::default());
        let strict = check(&engine, "x;\nbad = 1;\n", Mode::Strict);
        assert_eq!(
            summary(&strict),
            vec![
                (1, 1, "line-start".to_string()),
                (2, 1, "line-start".to_string()),
                (2, 1, "bad-name".to_string()),
            ]
        );
    }

    #[test]
    fn test_disabled_rule_and_severity_override() {
        let mut config = Config::default();
        config.disable_rule("line-start");
        config.rules.entry("bad-name".into()).or_default().severity = Some(Severity::Warning);
        let engine = engine(config);

        let found = check(&engine, "bad;\n", Mode::Strict);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn test_errors_become_diagnostics() {
        let engine = engine(Config::default());
        let found = check(&engine, "s = \"open;\n}\n", Mode::Normal);
        let codes: Vec<_> = found.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![LEX_ERROR_CODE, STRUCTURE_ERROR_CODE]);
        assert_eq!(found[1].message, "unmatched closing brace");
    }

    #[test]
    fn test_allow_comment_suppresses() {
        let engine = engine(Config::default());
        let src = "// cstyle: allow(bad-name)\nbad;\nbad;\n";
        let found = check(&engine, src, Mode::Normal);
        assert_eq!(summary(&found), vec![(3, 1, "bad-name".to_string())]);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let engine = engine(Config::default());
        let src = "bad;\n  bad(bad);\n}\n";
        assert_eq!(
            check(&engine, src, Mode::Strict),
            check(&engine, src, Mode::Strict)
        );
    }
}
