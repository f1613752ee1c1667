//! Golden tests over the annotated C fixtures.
//!
//! Each fixture documents its own expected findings in comments; the
//! snapshots below pin them down in the compact report format.

use cstyle_core::syntax::MAX_NESTING;
use cstyle_core::{Config, Engine, FileContext, Mode, Violation, STRUCTURE_ERROR_CODE};
use cstyle_rules::{all_rules, missing_braces};
use insta::assert_snapshot;
use std::collections::BTreeSet;
use std::path::Path;

const FILE1: &str = include_str!("fixtures/file1.c");
const FILE3: &str = include_str!("fixtures/file3.c");
const FILE4: &str = include_str!("fixtures/file4.c");

fn check(name: &str, content: &str, mode: Mode) -> Vec<Violation> {
    let engine = Engine::new(all_rules(), Config::default());
    let ctx = FileContext::new(Path::new(name), content, Path::new(".")).with_mode(mode);
    engine.check(&ctx)
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_clean_file_has_no_findings() {
    assert!(check("file1.c", FILE1, Mode::Normal).is_empty());
    assert!(check("file1.c", FILE1, Mode::Strict).is_empty());
}

#[test]
fn test_file3_normal() {
    assert_snapshot!(render(&check("file3.c", FILE3, Mode::Normal)), @r#"
    file3.c:20:3: error [CS001] missing space between `if` and `(`
    file3.c:21:3: error [CS002] opening brace of `if` should be on the line of its condition
    file3.c:24:3: error [CS002] `else` should be on the line of the closing brace
    file3.c:28:3: error [CS003] body of `if` should be enclosed in braces
    file3.c:32:5: error [CS004] expected indentation of 2, found 4
    "#);
}

#[test]
fn test_file3_strict() {
    assert_snapshot!(render(&check("file3.c", FILE3, Mode::Strict)), @r#"
    file3.c:20:3: error [CS001] missing space between `if` and `(`
    file3.c:21:3: error [CS002] opening brace of `if` should be on the line of its condition
    file3.c:24:3: error [CS002] `else` should be on the line of the closing brace
    file3.c:28:3: error [CS003] body of `if` should be enclosed in braces
    file3.c:30:12: error [CS007] magic string literal `"This if statement should have curly braces. This string is also"...`
    file3.c:32:5: error [CS004] expected indentation of 2, found 4
    file3.c:32:12: error [CS007] magic string literal `"This statement is not part of the previous if statement"`
    "#);
}

#[test]
fn test_file4_normal() {
    assert_snapshot!(render(&check("file4.c", FILE4, Mode::Normal)), @r"
    file4.c:19:4: error [CS003] body of `if` should be enclosed in braces
    file4.c:19:4: error [CS004] expected indentation of 4, found 3
    file4.c:20:7: error [CS003] body of `if` should be enclosed in braces
    file4.c:21:9: error [CS003] body of `if` should be enclosed in braces
    file4.c:22:10: error [CS004] expected indentation of 10, found 9
    file4.c:24:11: error [CS004] expected indentation of 4, found 10
    ");
}

#[test]
fn test_file4_strict() {
    assert_snapshot!(render(&check("file4.c", FILE4, Mode::Strict)), @r#"
    file4.c:16:11: error [CS007] magic number `10`
    file4.c:19:4: error [CS003] body of `if` should be enclosed in braces
    file4.c:19:4: error [CS004] expected indentation of 4, found 3
    file4.c:20:7: error [CS003] body of `if` should be enclosed in braces
    file4.c:20:15: error [CS007] magic number `5`
    file4.c:21:9: error [CS003] body of `if` should be enclosed in braces
    file4.c:22:10: error [CS004] expected indentation of 10, found 9
    file4.c:23:18: error [CS007] magic string literal `"Hello World\n"`
    file4.c:24:11: error [CS004] expected indentation of 4, found 10
    file4.c:24:18: error [CS007] magic string literal `"This statement is not part of the if's"`
    "#);
}

#[test]
fn test_one_line_if_else() {
    let src = "if(x){y();}else{z();}\n";
    assert_snapshot!(render(&check("t.c", src, Mode::Normal)), @"t.c:1:1: error [CS001] missing space between `if` and `(`");
    assert_snapshot!(render(&check("t.c", src, Mode::Strict)), @r"
    t.c:1:1: error [CS001] missing space between `if` and `(`
    t.c:1:7: error [CS011] statement after `{` should start on the next line
    t.c:1:11: error [CS011] `}` should be on its own line
    t.c:1:17: error [CS011] statement after `{` should start on the next line
    t.c:1:21: error [CS011] `}` should be on its own line
    ");
}

#[test]
fn test_strict_is_superset_of_normal() {
    for (name, content) in [("file1.c", FILE1), ("file3.c", FILE3), ("file4.c", FILE4)] {
        let normal: BTreeSet<String> = check(name, content, Mode::Normal)
            .iter()
            .map(ToString::to_string)
            .collect();
        let strict: BTreeSet<String> = check(name, content, Mode::Strict)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(normal.is_subset(&strict), "{name}: {normal:?} not in {strict:?}");
    }
}

#[test]
fn test_nesting_depth_gives_one_finding_per_level() {
    for depth in 1..=8 {
        let mut src = String::from("int main() {\n");
        for level in 1..=depth {
            src.push_str(&"  ".repeat(level));
            src.push_str("if (x)\n");
        }
        src.push_str(&"  ".repeat(depth + 1));
        src.push_str("y();\n}\n");

        let found = check("deep.c", &src, Mode::Normal);
        assert_eq!(found.len(), depth, "depth {depth}: {found:?}");
        assert!(found.iter().all(|v| v.code == missing_braces::CODE));
    }
}

#[test]
fn test_pathological_nesting_is_capped() {
    let src = format!("int main() {{{}y();}}\n", "if (x) ".repeat(10_000));
    let found = check("deep.c", &src, Mode::Normal);
    let count = |code: &str| found.iter().filter(|v| v.code == code).count();
    assert_eq!(count(missing_braces::CODE), MAX_NESTING);
    assert_eq!(count(STRUCTURE_ERROR_CODE), 1);
}

#[test]
fn test_results_are_deterministic() {
    for content in [FILE1, FILE3, FILE4] {
        assert_eq!(
            check("f.c", content, Mode::Strict),
            check("f.c", content, Mode::Strict)
        );
    }
}

#[test]
fn test_allow_comment_silences_fixture_finding() {
    let patched = FILE3.replace(
        "  if(ptr[0])",
        "  if(ptr[0]) // cstyle: allow(keyword-spacing)",
    );
    let found = check("file3.c", &patched, Mode::Normal);
    assert!(found.iter().all(|v| v.rule != "keyword-spacing"));
    assert_eq!(found.len(), 4);
}
