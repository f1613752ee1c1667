//! Integration test: configuration, discovery and evaluation end-to-end.
//!
//! Uses a throwaway rule so the core pipeline is exercised without the
//! built-in rule set.

use cstyle_core::{
    Analyzer, Config, FileContext, Mode, ModeSet, Rule, Severity, SourceFile, Violation,
    LEX_ERROR_CODE, STRUCTURE_ERROR_CODE,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Flags every `goto`; strict mode only.
struct NoGoto;

impl Rule for NoGoto {
    fn name(&self) -> &'static str {
        "no-goto"
    }

    fn code(&self) -> &'static str {
        "T001"
    }

    fn modes(&self) -> ModeSet {
        ModeSet::STRICT
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        (0..file.tokens.len())
            .filter(|&i| file.tokens[i].is_keyword("goto"))
            .map(|i| ctx.violation(self, file, i, "goto statement"))
            .collect()
    }
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, content).expect("write file");
    }
    dir
}

fn analyze(dir: &TempDir, config: &str) -> Vec<String> {
    let config = Config::parse(config).expect("config should parse");
    let analyzer = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .rule(NoGoto)
        .build()
        .expect("analyzer should build");
    analyzer
        .analyze()
        .expect("analysis should succeed")
        .violations
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ── Mode gating and configuration ──

#[test]
fn strict_rule_is_silent_in_normal_mode() {
    let dir = project(&[("main.c", "void f() {\n  goto out;\n}\n")]);
    assert!(analyze(&dir, "").is_empty());
    assert_eq!(
        analyze(&dir, "mode = \"strict\""),
        vec!["main.c:2:3: error [T001] goto statement"]
    );
}

#[test]
fn config_overrides_severity_and_disables_rules() {
    let dir = project(&[("main.c", "goto out;\n")]);
    let warned = analyze(
        &dir,
        "mode = \"strict\"\n[rules.no-goto]\nseverity = \"warning\"\n",
    );
    assert_eq!(warned, vec!["main.c:1:1: warning [T001] goto statement"]);

    let disabled = analyze(&dir, "mode = \"strict\"\n[rules.no-goto]\nenabled = false\n");
    assert!(disabled.is_empty());
}

#[test]
fn results_are_ordered_by_path_then_position() {
    let dir = project(&[
        ("src/b.c", "goto x;\ngoto y;\n"),
        ("a.h", "int a; goto z;\n"),
        ("README.md", "goto nowhere;\n"),
    ]);
    assert_eq!(
        analyze(&dir, "mode = \"strict\""),
        vec![
            "a.h:1:8: error [T001] goto statement",
            "src/b.c:1:1: error [T001] goto statement",
            "src/b.c:2:1: error [T001] goto statement",
        ]
    );
}

#[test]
fn non_utf8_file_is_checked_lossily() {
    let dir = project(&[("a.c", "goto x;\n")]);
    fs::write(dir.path().join("b.c"), b"/* caf\xe9 */\ngoto z;\n").expect("write file");

    let analyzer = Analyzer::builder()
        .root(dir.path())
        .mode(Mode::Strict)
        .rule(NoGoto)
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");

    assert_eq!(result.files_checked, 2);
    let found: Vec<String> = result.violations.iter().map(ToString::to_string).collect();
    assert_eq!(
        found,
        vec![
            "a.c:1:1: error [T001] goto statement",
            "b.c:2:1: error [T001] goto statement",
        ]
    );
}

// ── Front-end diagnostics ──

#[test]
fn broken_input_is_reported_not_fatal() {
    let analyzer = Analyzer::builder()
        .root(".")
        .mode(Mode::Strict)
        .rule(NoGoto)
        .build()
        .expect("analyzer should build");
    let found = analyzer.check_source(
        Path::new("broken.c"),
        "char *s = \"open;\nvoid f() {\n  goto out;\n",
    );

    let codes: Vec<&str> = found.iter().map(|v| v.code.as_str()).collect();
    assert!(codes.contains(&LEX_ERROR_CODE), "{codes:?}");
    assert!(codes.contains(&STRUCTURE_ERROR_CODE), "{codes:?}");
    assert!(codes.contains(&"T001"), "{codes:?}");
    assert!(found.iter().all(|v| v.severity == Severity::Error));
}

#[test]
fn balanced_input_has_no_front_end_errors() {
    let src = "#include <stdio.h>\n\nstruct p { int x; };\n\nint main(void) {\n  \
               do {\n    x++;\n  } while (x < 3);\n  switch (x) {\n    case 1:\n      \
               break;\n  }\n  return 0;\n}\n";
    let file = SourceFile::parse(src);
    assert!(file.lex_errors.is_empty());
    assert!(file.structure_errors.is_empty());
    assert_eq!(
        file.tokens.iter().map(|t| t.text).collect::<String>(),
        src
    );
}
