//! Rule enforcing consistent indentation.
//!
//! # Rationale
//!
//! Indentation should reflect structure. Every statement sits one indent
//! unit deeper than the block or control statement that owns it, closing
//! braces line up with their owner, and a comment on its own line lines up
//! with the code it introduces.
//!
//! Expected columns are derived from the owner's *expected* column, so a
//! single misplaced line is reported once rather than cascading into
//! everything nested under it.
//!
//! # Details
//!
//! - Columns are visual; a tab counts as `style.tab_width` columns.
//! - The indent unit is `style.indent_width`, or else detected from the
//!   first indented line of the first function body (default 2).
//! - An unbraced body on its own line sits one unit deeper than its
//!   header; on the header's line it is not checked.
//! - `case`/`default` labels may sit at the `switch` column or one unit
//!   deeper, whichever the first label uses; statements after a label sit
//!   one unit deeper than the label.
//! - Continuation lines of a multi-line statement, goto labels, enum
//!   bodies and initializers are not checked.
//! - The `*` lines of a block comment sit one column right of its `/*`.
//!
//! # Suppression
//!
//! - `// cstyle: allow(indentation)` comment

use cstyle_core::syntax::{
    visual_width, Block, Body, Declaration, DoWhile, IfStmt, Parens, SourceFile, Stmt, TokenIdx,
    TokenKind,
};
use cstyle_core::{FileContext, Rule, Violation};

/// Rule code for indentation.
pub const CODE: &str = "CS004";

/// Rule name for indentation.
pub const NAME: &str = "indentation";

/// Indent unit used when nothing else determines one.
pub const DEFAULT_INDENT: usize = 2;

/// Checks statement, brace and comment indentation.
#[derive(Debug, Clone, Default)]
pub struct Indentation {
    indent_width: Option<usize>,
}

impl Indentation {
    /// Creates a new rule that takes its indent unit from the file context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the indent unit, overriding configuration and detection.
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = Some(width);
        self
    }
}

impl Rule for Indentation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires statements, braces and comments at their structural indentation"
    }

    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
        let tab_width = ctx.style.tab_width;
        let unit = self
            .indent_width
            .or(ctx.style.indent_width)
            .or_else(|| detect_indent(file, tab_width))
            .unwrap_or(DEFAULT_INDENT);

        let mut checker = IndentChecker {
            ctx,
            file,
            rule: self,
            unit,
            tab_width,
            anchors: Vec::new(),
            opaque: Vec::new(),
            violations: Vec::new(),
        };
        checker.stmts(&file.items, 0);
        checker.comments();
        checker.violations.sort_by(Violation::cmp_location);
        checker.violations
    }
}

/// Detects the indent unit from the first function body.
fn detect_indent(file: &SourceFile, tab_width: usize) -> Option<usize> {
    let function = file.items.iter().find_map(|stmt| match stmt {
        Stmt::Function(f) => Some(f),
        _ => None,
    })?;
    let header = file.visual_column(function.header.first, tab_width);
    let end = function.body.close.unwrap_or(file.tokens.len());
    let first = (function.body.open + 1..end).find(|&i| {
        file.token(i).kind != TokenKind::Whitespace && file.is_line_leading(i)
    })?;
    file.visual_column(first, tab_width)
        .checked_sub(header)
        .filter(|&unit| unit > 0)
}

struct IndentChecker<'a, 'src> {
    ctx: &'a FileContext<'a>,
    file: &'a SourceFile<'src>,
    rule: &'a Indentation,
    unit: usize,
    tab_width: usize,
    /// Tokens a preceding own-line comment aligns with, with their column.
    anchors: Vec<(TokenIdx, usize)>,
    /// Token ranges whose inner comments are not checked.
    opaque: Vec<(TokenIdx, TokenIdx)>,
    violations: Vec<Violation>,
}

impl IndentChecker<'_, '_> {
    fn check(&mut self, idx: TokenIdx, expected: usize) {
        if !self.file.is_line_leading(idx) {
            return;
        }
        let found = self.file.visual_column(idx, self.tab_width);
        if found != expected {
            self.violations.push(self.ctx.violation(
                self.rule,
                self.file,
                idx,
                format!("expected indentation of {expected}, found {found}"),
            ));
        }
    }

    /// Checks a token that starts a construct and records it as an anchor.
    fn leading(&mut self, idx: TokenIdx, expected: usize) {
        self.anchors.push((idx, expected));
        self.check(idx, expected);
    }

    fn stmts(&mut self, stmts: &[Stmt], col: usize) {
        for stmt in stmts {
            self.stmt(stmt, col, true);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, col: usize, check_first: bool) {
        let goto_label = matches!(stmt, Stmt::Label(s) if !self.is_switch_label(s.first));
        if check_first && !goto_label {
            self.leading(stmt.first_token(), col);
        }
        match stmt {
            Stmt::Expression(s) | Stmt::Label(s) | Stmt::Other(s) => {
                self.opaque.push((s.first, s.last));
            }
            Stmt::Declaration(d) => self.declaration(d, col),
            Stmt::If(node) => self.if_stmt(node, col),
            Stmt::While(c) | Stmt::For(c) => {
                self.condition(c.condition.as_ref());
                let header_end = header_end(c.keyword, c.condition.as_ref());
                self.body(&c.body, header_end, col);
            }
            Stmt::Switch(c) => {
                self.condition(c.condition.as_ref());
                match &c.body {
                    Body::Block(block) => self.switch_block(block, col),
                    other => {
                        let header_end = header_end(c.keyword, c.condition.as_ref());
                        self.body(other, header_end, col);
                    }
                }
            }
            Stmt::DoWhile(d) => self.do_while(d, col),
            Stmt::Block(block) => self.block(block, col),
            Stmt::Function(f) => {
                self.opaque.push((f.header.first, f.header.last));
                self.block(&f.body, col);
            }
            Stmt::Empty(_) => {}
        }
    }

    fn declaration(&mut self, d: &Declaration, col: usize) {
        match &d.members {
            Some(members) => {
                self.opaque.push((d.first, members.open));
                self.opaque.push((members.last_token(), d.last));
                self.block(members, col);
            }
            None => self.opaque.push((d.first, d.last)),
        }
    }

    fn if_stmt(&mut self, node: &IfStmt, col: usize) {
        self.condition(node.condition.as_ref());
        let header_end = header_end(node.keyword, node.condition.as_ref());
        self.body(&node.then_body, header_end, col);

        let Some(else_branch) = &node.else_branch else {
            return;
        };
        self.leading(else_branch.keyword, col);
        match else_if(&else_branch.body) {
            // `else if` on one line continues the chain at this column.
            Some(inner) if self.same_line(else_branch.keyword, inner.keyword) => {
                self.if_stmt(inner, col);
            }
            _ => self.body(&else_branch.body, else_branch.keyword, col),
        }
    }

    fn do_while(&mut self, d: &DoWhile, col: usize) {
        self.body(&d.body, d.keyword, col);
        if let Some(while_keyword) = d.while_keyword {
            self.leading(while_keyword, col);
        }
        self.condition(d.condition.as_ref());
    }

    /// Checks a control body owned by a statement at `col`.
    fn body(&mut self, body: &Body, header_end: TokenIdx, col: usize) {
        match body {
            Body::Block(block) => self.block(block, col),
            Body::Single(stmt) => {
                let own_line = !self.same_line(header_end, stmt.first_token());
                if own_line {
                    self.stmt(stmt, col + self.unit, true);
                } else {
                    self.stmt(stmt, col, false);
                }
            }
            Body::Missing => {}
        }
    }

    fn block(&mut self, block: &Block, col: usize) {
        self.leading(block.open, col);
        self.stmts(&block.stmts, col + self.unit);
        if let Some(close) = block.close {
            self.anchors.push((close, col + self.unit));
            self.check(close, col);
        }
    }

    fn switch_block(&mut self, block: &Block, col: usize) {
        self.leading(block.open, col);

        let label_col = block
            .stmts
            .iter()
            .find_map(|stmt| match stmt {
                Stmt::Label(s) if self.is_switch_label(s.first) => Some(s.first),
                _ => None,
            })
            .map_or(col + self.unit, |first| {
                let found = self.file.visual_column(first, self.tab_width);
                if self.file.is_line_leading(first) && found == col {
                    col
                } else {
                    col + self.unit
                }
            });

        let mut stmt_col = col + self.unit;
        for stmt in &block.stmts {
            match stmt {
                Stmt::Label(s) if self.is_switch_label(s.first) => {
                    self.stmt(stmt, label_col, true);
                    stmt_col = label_col + self.unit;
                }
                _ => self.stmt(stmt, stmt_col, true),
            }
        }

        if let Some(close) = block.close {
            self.anchors.push((close, stmt_col));
            self.check(close, col);
        }
    }

    fn condition(&mut self, condition: Option<&Parens>) {
        if let Some(Parens {
            open,
            close: Some(close),
        }) = condition
        {
            self.opaque.push((*open, *close));
        }
    }

    fn is_switch_label(&self, idx: TokenIdx) -> bool {
        let tok = self.file.token(idx);
        tok.is_keyword("case") || tok.is_keyword("default")
    }

    fn same_line(&self, a: TokenIdx, b: TokenIdx) -> bool {
        self.file.token(a).end_line() == self.file.token(b).line()
    }

    /// Checks own-line comments against the construct that follows them.
    fn comments(&mut self) {
        self.anchors.sort_by_key(|&(idx, _)| idx);
        let comments: Vec<TokenIdx> = (0..self.file.tokens.len())
            .filter(|&i| self.file.token(i).kind.is_comment() && self.file.is_line_leading(i))
            .filter(|&i| !self.opaque.iter().any(|&(a, b)| a < i && i < b))
            .collect();

        for idx in comments {
            let next = self.anchors.partition_point(|&(anchor, _)| anchor < idx);
            let expected = self.anchors.get(next).map_or(0, |&(_, col)| col);
            self.check(idx, expected);
            if self.file.token(idx).kind == TokenKind::BlockComment {
                self.block_comment_lines(idx);
            }
        }
    }

    /// Checks the `*` lines of a multi-line block comment.
    fn block_comment_lines(&mut self, idx: TokenIdx) {
        let token = self.file.token(idx);
        let expected = self.file.visual_column(idx, self.tab_width) + 1;
        for line in token.line() + 1..=token.end_line() {
            let text = self.file.line_text(line);
            let body = text.trim_start_matches(|c: char| c == ' ' || c == '\t');
            if !body.starts_with('*') {
                continue;
            }
            let indent = &text[..text.len() - body.len()];
            let found = visual_width(indent, self.tab_width);
            if found != expected {
                self.violations.push(Violation::new(
                    CODE,
                    NAME,
                    self.rule.default_severity(),
                    self.ctx.location_at(line, indent.chars().count() + 1),
                    format!("expected indentation of {expected}, found {found}"),
                ));
            }
        }
    }
}

/// Last token of a control header: the condition's `)` or the keyword.
fn header_end(keyword: TokenIdx, condition: Option<&Parens>) -> TokenIdx {
    condition
        .map(|c| c.close.unwrap_or(c.open))
        .unwrap_or(keyword)
}

fn else_if(body: &Body) -> Option<&IfStmt> {
    match body.as_single() {
        Some(Stmt::If(inner)) => Some(inner),
        _ => None,
    }
}
