//! Rule requiring braces around control statement bodies.
//!
//! # Rationale
//!
//! An unbraced body holds exactly one statement no matter how the lines
//! after it are indented:
//!
//! ```c
//! if (x == 1)
//!   a();
//!   b();  /* always runs */
//! ```
//!
//! Requiring braces removes the trap. `else if` chains are exempt: the `if`
//! after `else` is the chain, not a missing block.
//!
//! # Suppression
//!
//! - `// cstyle: allow(missing-braces)` comment

use cstyle_core::syntax::{
    walk_conditional, walk_do_while, walk_if, walk_stmts, Body, Conditional, DoWhile, IfStmt,
    Visit,
};
use cstyle_core::{FileContext, Rule, SourceFile, Suggestion, Violation};

/// Rule code for missing-braces.
pub const CODE: &str = "CS003";

/// Rule name for missing-braces.
pub const NAME: &str = "missing-braces";

/// Requires every control statement body to be a braced block.
#[derive(Debug, Clone, Default)]
pub struct MissingBraces;

impl MissingBraces {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MissingBraces {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires braces around the body of every control statement"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let mut visitor = MissingBracesVisitor {
            ctx,
            file,
            rule: self,
            violations: Vec::new(),
        };
        walk_stmts(&mut visitor, &file.items);
        visitor.violations
    }
}

struct MissingBracesVisitor<'a, 'src> {
    ctx: &'a FileContext<'a>,
    file: &'a SourceFile<'src>,
    rule: &'a MissingBraces,
    violations: Vec<Violation>,
}

impl MissingBracesVisitor<'_, '_> {
    fn check_body(&mut self, keyword: usize, body: &Body) {
        let name = self.file.token(keyword).text;
        match body {
            Body::Block(_) => {}
            Body::Single(_) => self.violations.push(
                self.ctx
                    .violation(
                        self.rule,
                        self.file,
                        keyword,
                        format!("body of `{name}` should be enclosed in braces"),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "wrap the statement after `{name}` in `{{ }}`"
                    ))),
            ),
            // Already a structure error.
            Body::Missing => {}
        }
    }
}

impl<'ast> Visit<'ast> for MissingBracesVisitor<'_, '_> {
    fn visit_if(&mut self, node: &'ast IfStmt) {
        self.check_body(node.keyword, &node.then_body);
        if let Some(else_branch) = &node.else_branch {
            if !else_branch.is_else_if() {
                self.check_body(else_branch.keyword, &else_branch.body);
            }
        }
        walk_if(self, node);
    }

    fn visit_conditional(&mut self, node: &'ast Conditional) {
        self.check_body(node.keyword, &node.body);
        walk_conditional(self, node);
    }

    fn visit_do_while(&mut self, node: &'ast DoWhile) {
        self.check_body(node.keyword, &node.body);
        walk_do_while(self, node);
    }
}
