//! Rule enforcing same-line opening braces for control statements.
//!
//! # Rationale
//!
//! The checked style puts the opening brace of a control statement at the
//! end of its header line and chains `else` and a do-loop's `while` onto
//! the closing brace:
//!
//! ```c
//! if (x) {
//!   a();
//! } else {
//!   b();
//! }
//! do {
//!   c();
//! } while (y);
//! ```
//!
//! Function definitions may open their body on either line.
//!
//! # Detected Patterns
//!
//! - `{` of an `if`/`while`/`for`/`switch` body not on the line of the
//!   condition's closing `)`
//! - `else` not on the line of the preceding block's `}`
//! - `{` of an `else` or `do` body not on the keyword's line
//! - a do-loop's `while` not on the line of the body's `}`
//!
//! # Suppression
//!
//! - `// cstyle: allow(brace-placement)` comment

use cstyle_core::syntax::{
    walk_conditional, walk_do_while, walk_if, walk_stmts, Body, Conditional, DoWhile, IfStmt,
    Parens, Visit,
};
use cstyle_core::{FileContext, Label, Rule, SourceFile, Violation};

/// Rule code for brace-placement.
pub const CODE: &str = "CS002";

/// Rule name for brace-placement.
pub const NAME: &str = "brace-placement";

/// Requires opening braces on the header line of control statements.
#[derive(Debug, Clone, Default)]
pub struct BracePlacement;

impl BracePlacement {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BracePlacement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires opening braces on the line of their control statement"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let mut visitor = BracePlacementVisitor {
            ctx,
            file,
            rule: self,
            violations: Vec::new(),
        };
        walk_stmts(&mut visitor, &file.items);
        visitor.violations
    }
}

struct BracePlacementVisitor<'a, 'src> {
    ctx: &'a FileContext<'a>,
    file: &'a SourceFile<'src>,
    rule: &'a BracePlacement,
    violations: Vec<Violation>,
}

impl BracePlacementVisitor<'_, '_> {
    fn line(&self, idx: usize) -> usize {
        self.file.token(idx).line()
    }

    /// Checks that a braced body opens on the line of its header.
    fn check_header(&mut self, keyword: usize, condition: Option<&Parens>, body: &Body) {
        let Some(block) = body.as_block() else {
            return;
        };
        let name = self.file.token(keyword).text;
        let Some(close) = condition.and_then(|c| c.close) else {
            self.violations.push(self.ctx.engine_warning(
                NAME,
                self.file,
                keyword,
                format!("condition of `{name}` is not closed, brace placement not checked"),
            ));
            return;
        };
        if self.line(block.open) != self.line(close) {
            let message = format!("opening brace of `{name}` should be on the line of its condition");
            self.violations.push(
                self.ctx
                    .violation(self.rule, self.file, block.open, message)
                    .with_label(Label::new(
                        self.ctx.location(self.file, close),
                        "condition ends here",
                    )),
            );
        }
    }

    /// Checks that a braced body opens on the line of `keyword`.
    fn check_keyword_brace(&mut self, keyword: usize, body: &Body) {
        let Some(block) = body.as_block() else {
            return;
        };
        if self.line(block.open) != self.line(keyword) {
            let name = self.file.token(keyword).text;
            self.violations.push(self.ctx.violation(
                self.rule,
                self.file,
                block.open,
                format!("opening brace of `{name}` should be on the line of `{name}`"),
            ));
        }
    }

    /// Checks that `keyword` follows the closing brace of `body` on its line.
    fn check_after_close(&mut self, body: &Body, keyword: usize) {
        let Some(close) = body.as_block().and_then(|b| b.close) else {
            return;
        };
        if self.line(keyword) != self.line(close) {
            let name = self.file.token(keyword).text;
            self.violations.push(self.ctx.violation(
                self.rule,
                self.file,
                keyword,
                format!("`{name}` should be on the line of the closing brace"),
            ));
        }
    }
}

impl<'ast> Visit<'ast> for BracePlacementVisitor<'_, '_> {
    fn visit_if(&mut self, node: &'ast IfStmt) {
        self.check_header(node.keyword, node.condition.as_ref(), &node.then_body);
        if let Some(else_branch) = &node.else_branch {
            self.check_after_close(&node.then_body, else_branch.keyword);
            self.check_keyword_brace(else_branch.keyword, &else_branch.body);
        }
        walk_if(self, node);
    }

    fn visit_conditional(&mut self, node: &'ast Conditional) {
        self.check_header(node.keyword, node.condition.as_ref(), &node.body);
        walk_conditional(self, node);
    }

    fn visit_do_while(&mut self, node: &'ast DoWhile) {
        self.check_keyword_brace(node.keyword, &node.body);
        if let Some(while_keyword) = node.while_keyword {
            self.check_after_close(&node.body, while_keyword);
        }
        walk_do_while(self, node);
    }
}
