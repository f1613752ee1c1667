//! Rule requiring a line break after `{` and before `}`.
//!
//! # Rationale
//!
//! Code packed onto a brace line, such as `if (x) { y(); }`, hides
//! statements at the end of the line. Comments after `{` are fine, and an
//! empty block `{}` is exempt.
//!
//! # Suppression
//!
//! - `// cstyle: allow(brace-line-break)` comment

use cstyle_core::syntax::{walk_block, walk_stmts, Block, Visit};
use cstyle_core::{FileContext, ModeSet, Rule, SourceFile, Violation};

/// Rule code for brace-line-break.
pub const CODE: &str = "CS011";

/// Rule name for brace-line-break.
pub const NAME: &str = "brace-line-break";

/// Requires statements inside a block to start and end on their own lines.
#[derive(Debug, Clone, Default)]
pub struct BraceLineBreak;

impl BraceLineBreak {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BraceLineBreak {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a line break after `{` and before `}`"
    }

    fn modes(&self) -> ModeSet {
        ModeSet::STRICT
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let mut visitor = LineBreakVisitor {
            ctx,
            file,
            rule: self,
            violations: Vec::new(),
        };
        walk_stmts(&mut visitor, &file.items);
        visitor.violations.sort_by(Violation::cmp_location);
        visitor.violations
    }
}

struct LineBreakVisitor<'a, 'src> {
    ctx: &'a FileContext<'a>,
    file: &'a SourceFile<'src>,
    rule: &'a BraceLineBreak,
    violations: Vec<Violation>,
}

impl<'ast> Visit<'ast> for LineBreakVisitor<'_, '_> {
    fn visit_block(&mut self, block: &'ast Block) {
        let file = self.file;
        let line = |idx: usize| file.token(idx).line();
        let first = file
            .next_significant(block.open)
            .filter(|&i| Some(i) != block.close);

        if let Some(first) = first {
            if line(first) == line(block.open) {
                self.violations.push(self.ctx.violation(
                    self.rule,
                    self.file,
                    first,
                    "statement after `{` should start on the next line",
                ));
            }
            if let Some(close) = block.close {
                let last = file.prev_significant(close).unwrap_or(block.open);
                if last != block.open && line(last) == line(close) {
                    self.violations.push(self.ctx.violation(
                        self.rule,
                        self.file,
                        close,
                        "`}` should be on its own line",
                    ));
                }
            }
        }

        walk_block(self, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<(usize, usize)> {
        let file = SourceFile::parse(code);
        let ctx = FileContext::new(Path::new("test.c"), code, Path::new("."));
        BraceLineBreak::new()
            .check(&ctx, &file)
            .iter()
            .map(|v| (v.location.line, v.location.column))
            .collect()
    }

    #[test]
    fn test_one_line_if_else() {
        assert_eq!(
            check_code("if(x){y();}else{z();}\n"),
            vec![(1, 7), (1, 11), (1, 17), (1, 21)]
        );
    }

    #[test]
    fn test_comment_after_brace_passes() {
        let code = "int main() {  // entry\n  if (a) {\n    b();\n  } else {\n    c();\n  }\n}\n";
        assert!(check_code(code).is_empty());
    }

    #[test]
    fn test_empty_block_passes() {
        assert!(check_code("void f() {}\nvoid g() {\n}\n").is_empty());
    }

    #[test]
    fn test_code_before_close() {
        let code = "void f() {\n  a(); }\n";
        assert_eq!(check_code(code), vec![(2, 8)]);
    }
}
