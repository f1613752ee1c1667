//! Rule forbidding magic literals inside functions.
//!
//! # Rationale
//!
//! A bare `10` or `"Hello World\n"` in the middle of a function says
//! nothing about what it stands for, and the same value repeated in several
//! places drifts apart. Naming it with a `#define`, a `const` or an `enum`
//! fixes both.
//!
//! # Details
//!
//! - Only literals inside function definitions (header and body) are
//!   checked. File-scope declarations, preprocessor lines and
//!   `const`/`enum` declarations count as named constants.
//! - `0`, `1`, `-1`, `"\n"`, `'\n'`, `'\0'` and the `fopen` mode strings
//!   are never magic.
//! - A string continued onto the next line with `\` is one literal.
//!
//! # Configuration
//!
//! - `allow`: additional literal spellings that are not magic, e.g.
//!   `["2", "\"%d\\n\""]`
//!
//! # Suppression
//!
//! - `// cstyle: allow(magic-literal)` comment

use cstyle_core::syntax::{walk_declaration, walk_stmts, Declaration, Stmt, TokenKind, Visit};
use cstyle_core::{FileContext, ModeSet, Rule, SourceFile, Suggestion, Violation};
use std::collections::HashSet;

/// Rule code for magic-literal.
pub const CODE: &str = "CS007";

/// Rule name for magic-literal.
pub const NAME: &str = "magic-literal";

/// Literal spellings that are never magic.
pub const NON_MAGIC: &[&str] = &[
    "0", "1", "-1", r#""\n""#, r"'\n'", r"'\0'", r#""r""#, r#""w""#, r#""a""#, r#""r+""#,
    r#""w+""#, r#""a+""#, r#""rb""#, r#""wb""#, r#""ab""#, r#""r+b""#, r#""w+b""#, r#""a+b""#,
    r#""rb+""#, r#""wb+""#, r#""ab+""#,
];

/// Forbids unnamed numeric, string and character literals in functions.
#[derive(Debug, Clone, Default)]
pub struct MagicLiteral {
    allow: HashSet<String>,
}

impl MagicLiteral {
    /// Creates a new rule with the built-in allow list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds literal spellings that are not magic.
    #[must_use]
    pub fn allow<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow.extend(literals.into_iter().map(Into::into));
        self
    }

    fn is_allowed(&self, text: &str) -> bool {
        NON_MAGIC.contains(&text) || self.allow.contains(text)
    }
}

impl Rule for MagicLiteral {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids magic numbers and strings inside functions"
    }

    fn modes(&self) -> ModeSet {
        ModeSet::STRICT
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let mut constants = NamedConstants {
            file,
            ranges: Vec::new(),
        };
        let mut violations = Vec::new();

        for function in file.items.iter().filter_map(|stmt| match stmt {
            Stmt::Function(f) => Some(f),
            _ => None,
        }) {
            walk_stmts(&mut constants, &function.body.stmts);
            let range = function.header.first..=function.body.last_token();
            for idx in range {
                let token = file.token(idx);
                if !token.kind.is_literal() || constants.contains(idx) {
                    continue;
                }
                let negated = file
                    .prev_significant(idx)
                    .is_some_and(|prev| file.token(prev).is_punct("-"));
                if self.is_allowed(token.text)
                    || (negated && self.is_allowed(&format!("-{}", token.text)))
                {
                    continue;
                }
                violations.push(
                    ctx.violation(self, file, idx, describe(token.kind, token.text))
                        .with_suggestion(Suggestion::new(
                            "name the value with a #define, const or enum",
                        )),
                );
            }
        }

        violations
    }
}

fn describe(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Number => format!("magic number `{text}`"),
        TokenKind::Char => format!("magic character literal `{text}`"),
        _ => match text.lines().next() {
            Some(first) if first.len() < text.len() => {
                format!("magic string literal `{}...`", first.trim_end_matches('\\'))
            }
            _ => format!("magic string literal `{text}`"),
        },
    }
}

/// Collects the token ranges of `const` and `enum` declarations.
struct NamedConstants<'a, 'src> {
    file: &'a SourceFile<'src>,
    ranges: Vec<(usize, usize)>,
}

impl NamedConstants<'_, '_> {
    fn contains(&self, idx: usize) -> bool {
        self.ranges.iter().any(|&(a, b)| a <= idx && idx <= b)
    }
}

impl<'ast> Visit<'ast> for NamedConstants<'_, '_> {
    fn visit_declaration(&mut self, node: &'ast Declaration) {
        let named = (node.first..=node.last)
            .map(|i| self.file.token(i))
            .filter(|t| !t.kind.is_trivia())
            .take_while(|t| !t.is_punct("="))
            .any(|t| t.is_keyword("const") || t.is_keyword("enum"));
        if named {
            self.ranges.push((node.first, node.last));
        }
        walk_declaration(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_with(rule: &MagicLiteral, code: &str) -> Vec<(usize, usize, String)> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        rule.check(&ctx, &file)
            .into_iter()
            .map(|v| (v.location.line, v.location.column, v.message))
            .collect()
    }

    fn check_code(code: &str) -> Vec<(usize, usize, String)> {
        check_with(&MagicLiteral::new(), code)
    }

    #[test]
    fn test_detects_numbers_strings_and_chars() {
        let code = "int main() {\n  int y = 10;\n  puts(\"hi\");\n  c = 'x';\n  return 0;\n}\n";
        assert_eq!(
            check_code(code),
            vec![
                (2, 11, "magic number `10`".to_string()),
                (3, 8, "magic string literal `\"hi\"`".to_string()),
                (4, 7, "magic character literal `'x'`".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_magic_values() {
        let code = "int main() {\n  int x = 0;\n  x = -1 + 1;\n  printf(\"\\n\");\n  f = fopen(p, \"rb\");\n  c = '\\0';\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_file_scope_and_directives_are_named() {
        let code = "#define LIMIT 80\nint table[4] = {1, 2, 3, 4};\nstatic const char *name = \"n\";\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_const_and_enum_declarations_in_functions() {
        let code = "int main() {\n  const int limit = 80;\n  enum { A = 5 };\n  char *p = (const char *) 7;\n}\n";
        assert_eq!(
            check_code(code),
            vec![(4, 28, "magic number `7`".to_string())]
        );
    }

    #[test]
    fn test_function_header_is_checked() {
        let code = "int f(int a[16]) {\n  return a[0];\n}\n";
        assert_eq!(check_code(code).len(), 1);
    }

    #[test]
    fn test_continued_string_is_one_literal() {
        let code = "int main() {\n  printf(\"one \"\\\n         \"two\");\n}\n";
        assert_eq!(
            check_code(code),
            vec![(2, 10, "magic string literal `\"one \"...`".to_string())]
        );
    }

    #[test]
    fn test_configured_allow_list() {
        let rule = MagicLiteral::new().allow(["10", "-5"]);
        let code = "int main() {\n  a = 10;\n  b = -5;\n  c = 5;\n}\n";
        assert_eq!(
            check_with(&rule, code),
            vec![(4, 7, "magic number `5`".to_string())]
        );
    }

    #[test]
    fn test_strict_only() {
        let modes = MagicLiteral::new().modes();
        assert!(!modes.contains(cstyle_core::Mode::Normal));
        assert!(modes.contains(cstyle_core::Mode::Strict));
    }
}
