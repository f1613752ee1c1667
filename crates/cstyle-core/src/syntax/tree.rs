//! Statement tree recovered from the token stream.
//!
//! Nodes never copy token data: every position is a [`TokenIdx`] into the
//! owning [`SourceFile`](super::SourceFile)'s token vector.

use super::token::TokenIdx;

/// A parenthesized condition such as `(x != y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parens {
    /// The opening `(`.
    pub open: TokenIdx,
    /// The matching `)`, absent when the parenthesis is never closed.
    pub close: Option<TokenIdx>,
}

/// A brace-delimited compound statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The opening `{`.
    pub open: TokenIdx,
    /// The matching `}`, absent when the block is never closed.
    pub close: Option<TokenIdx>,
    /// Statements in source order.
    pub stmts: Vec<Stmt>,
}

/// The body of a control construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// A braced body.
    Block(Block),
    /// An unbraced body: exactly one statement.
    Single(Box<Stmt>),
    /// No body could be found (end of input or a stray `}`).
    Missing,
}

impl Body {
    /// Returns the braced block, if this body is one.
    #[must_use]
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Returns the single inferred statement, if this body is one.
    #[must_use]
    pub fn as_single(&self) -> Option<&Stmt> {
        match self {
            Self::Single(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// First token of the body.
    #[must_use]
    pub fn first_token(&self) -> Option<TokenIdx> {
        match self {
            Self::Block(block) => Some(block.open),
            Self::Single(stmt) => Some(stmt.first_token()),
            Self::Missing => None,
        }
    }

    /// Last token of the body.
    #[must_use]
    pub fn last_token(&self) -> Option<TokenIdx> {
        match self {
            Self::Block(block) => Some(block.last_token()),
            Self::Single(stmt) => Some(stmt.last_token()),
            Self::Missing => None,
        }
    }
}

impl Block {
    /// Last token belonging to the block.
    #[must_use]
    pub fn last_token(&self) -> TokenIdx {
        self.close
            .or_else(|| self.stmts.last().map(Stmt::last_token))
            .unwrap_or(self.open)
    }
}

/// `if (cond) then [else otherwise]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    /// The `if` keyword.
    pub keyword: TokenIdx,
    /// The condition, absent when no `(` follows the keyword.
    pub condition: Option<Parens>,
    /// The body taken when the condition holds.
    pub then_body: Body,
    /// The optional `else` branch.
    pub else_branch: Option<ElseBranch>,
}

/// `else body`, where the body may itself be an `if` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseBranch {
    /// The `else` keyword.
    pub keyword: TokenIdx,
    /// The else body.
    pub body: Body,
}

impl ElseBranch {
    /// Returns true for `else if`.
    #[must_use]
    pub fn is_else_if(&self) -> bool {
        matches!(self.body.as_single(), Some(Stmt::If(_)))
    }
}

/// `while`, `for`, or `switch` with a condition and a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    /// The construct's keyword.
    pub keyword: TokenIdx,
    /// The parenthesized header.
    pub condition: Option<Parens>,
    /// The body.
    pub body: Body,
}

/// `do body while (cond);`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoWhile {
    /// The `do` keyword.
    pub keyword: TokenIdx,
    /// The loop body.
    pub body: Body,
    /// The trailing `while` keyword.
    pub while_keyword: Option<TokenIdx>,
    /// The trailing condition.
    pub condition: Option<Parens>,
    /// Last token of the statement (normally the `;`).
    pub end: TokenIdx,
}

/// A statement made of a flat token range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simple {
    /// First significant token.
    pub first: TokenIdx,
    /// Last significant token (the terminator when present).
    pub last: TokenIdx,
}

/// A declaration, optionally defining `struct`/`union` members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// First significant token.
    pub first: TokenIdx,
    /// Last significant token.
    pub last: TokenIdx,
    /// Member block of a `struct` or `union` definition.
    pub members: Option<Block>,
}

/// A function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// The signature up to the closing `)`.
    pub header: Simple,
    /// The function body.
    pub body: Block,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// An expression followed by `;`.
    Expression(Simple),
    /// A declaration.
    Declaration(Declaration),
    /// An `if` statement.
    If(IfStmt),
    /// A `while` loop.
    While(Conditional),
    /// A `for` loop.
    For(Conditional),
    /// A `switch` statement.
    Switch(Conditional),
    /// A `do ... while` loop.
    DoWhile(DoWhile),
    /// A nested compound statement.
    Block(Block),
    /// A function definition.
    Function(FunctionDef),
    /// A `case`/`default` label or a goto label.
    Label(Simple),
    /// A lone `;`.
    Empty(TokenIdx),
    /// Anything else (`return`, `break`, stray tokens).
    Other(Simple),
}

impl Stmt {
    /// First token of the statement.
    #[must_use]
    pub fn first_token(&self) -> TokenIdx {
        match self {
            Self::Expression(s) | Self::Label(s) | Self::Other(s) => s.first,
            Self::Declaration(d) => d.first,
            Self::If(s) => s.keyword,
            Self::While(c) | Self::For(c) | Self::Switch(c) => c.keyword,
            Self::DoWhile(d) => d.keyword,
            Self::Block(b) => b.open,
            Self::Function(f) => f.header.first,
            Self::Empty(t) => *t,
        }
    }

    /// Last token of the statement.
    #[must_use]
    pub fn last_token(&self) -> TokenIdx {
        match self {
            Self::Expression(s) | Self::Label(s) | Self::Other(s) => s.last,
            Self::Declaration(d) => d.last,
            Self::If(s) => s
                .else_branch
                .as_ref()
                .and_then(|e| e.body.last_token().or(Some(e.keyword)))
                .or_else(|| s.then_body.last_token())
                .or_else(|| s.condition.as_ref().map(|c| c.close.unwrap_or(c.open)))
                .unwrap_or(s.keyword),
            Self::While(c) | Self::For(c) | Self::Switch(c) => c
                .body
                .last_token()
                .or_else(|| c.condition.as_ref().map(|p| p.close.unwrap_or(p.open)))
                .unwrap_or(c.keyword),
            Self::DoWhile(d) => d.end,
            Self::Block(b) => b.last_token(),
            Self::Function(f) => f.body.last_token(),
            Self::Empty(t) => *t,
        }
    }

    /// Short human-readable name of the statement kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Expression(_) => "expression",
            Self::Declaration(_) => "declaration",
            Self::If(_) => "if",
            Self::While(_) => "while",
            Self::For(_) => "for",
            Self::Switch(_) => "switch",
            Self::DoWhile(_) => "do-while",
            Self::Block(_) => "block",
            Self::Function(_) => "function",
            Self::Label(_) => "label",
            Self::Empty(_) => "empty",
            Self::Other(_) => "other",
        }
    }
}

/// Read-only traversal over the statement tree.
///
/// Every method defaults to walking its children, so implementors override
/// only the nodes they care about and call the matching `walk_*` function
/// to keep descending.
pub trait Visit<'ast> {
    /// Visits a statement.
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visits a braced block.
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    /// Visits a control-construct body.
    fn visit_body(&mut self, body: &'ast Body) {
        walk_body(self, body);
    }

    /// Visits an `if` statement.
    fn visit_if(&mut self, node: &'ast IfStmt) {
        walk_if(self, node);
    }

    /// Visits a `while`, `for`, or `switch` statement.
    fn visit_conditional(&mut self, node: &'ast Conditional) {
        walk_conditional(self, node);
    }

    /// Visits a `do ... while` loop.
    fn visit_do_while(&mut self, node: &'ast DoWhile) {
        walk_do_while(self, node);
    }

    /// Visits a function definition.
    fn visit_function(&mut self, node: &'ast FunctionDef) {
        walk_function(self, node);
    }

    /// Visits a declaration.
    fn visit_declaration(&mut self, node: &'ast Declaration) {
        walk_declaration(self, node);
    }
}

/// Visits each statement of a list.
pub fn walk_stmts<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

/// Dispatches a statement to the matching visitor method.
pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::If(node) => v.visit_if(node),
        Stmt::While(node) | Stmt::For(node) | Stmt::Switch(node) => v.visit_conditional(node),
        Stmt::DoWhile(node) => v.visit_do_while(node),
        Stmt::Block(block) => v.visit_block(block),
        Stmt::Function(node) => v.visit_function(node),
        Stmt::Declaration(node) => v.visit_declaration(node),
        Stmt::Expression(_) | Stmt::Label(_) | Stmt::Empty(_) | Stmt::Other(_) => {}
    }
}

/// Walks the statements of a block.
pub fn walk_block<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, block: &'ast Block) {
    walk_stmts(v, &block.stmts);
}

/// Walks into a body.
pub fn walk_body<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, body: &'ast Body) {
    match body {
        Body::Block(block) => v.visit_block(block),
        Body::Single(stmt) => v.visit_stmt(stmt),
        Body::Missing => {}
    }
}

/// Walks both branches of an `if`.
pub fn walk_if<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast IfStmt) {
    v.visit_body(&node.then_body);
    if let Some(else_branch) = &node.else_branch {
        v.visit_body(&else_branch.body);
    }
}

/// Walks a loop or switch body.
pub fn walk_conditional<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Conditional) {
    v.visit_body(&node.body);
}

/// Walks a `do` loop body.
pub fn walk_do_while<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast DoWhile) {
    v.visit_body(&node.body);
}

/// Walks a function body.
pub fn walk_function<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast FunctionDef) {
    v.visit_block(&node.body);
}

/// Walks `struct`/`union` members.
pub fn walk_declaration<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, node: &'ast Declaration) {
    if let Some(members) = &node.members {
        v.visit_block(members);
    }
}
