//! Block structure resolver.
//!
//! Rebuilds the statement tree from the token stream with a small
//! recursive-descent scanner. Bodies are resolved structurally: an unbraced
//! control body is exactly the next statement, delimited by its own
//! terminator, whatever its indentation says. Statements nested deeper
//! than [`MAX_NESTING`] are left unresolved.

use super::token::{Token, TokenIdx, TokenKind, DECLARATION_KEYWORDS};
use super::tree::{
    Block, Body, Conditional, Declaration, DoWhile, ElseBranch, FunctionDef, IfStmt, Parens,
    Simple, Stmt,
};
use thiserror::Error;

/// Structure error type.
///
/// Recorded while resolving; resolution always continues past them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A `}` with no open block.
    #[error("unmatched closing brace")]
    UnmatchedClose {
        /// The stray `}`.
        token: TokenIdx,
    },

    /// A `{` never closed before the end of input.
    #[error("unclosed brace")]
    UnclosedBlock {
        /// The opening `{`.
        token: TokenIdx,
    },

    /// A `(` or `[` never closed.
    #[error("unclosed parenthesis")]
    UnclosedParen {
        /// The opening token.
        token: TokenIdx,
    },

    /// A `)` or `]` with nothing to close.
    #[error("unmatched closing parenthesis")]
    UnmatchedParen {
        /// The stray token.
        token: TokenIdx,
    },

    /// An `else` not preceded by an `if` body.
    #[error("`else` without a matching `if`")]
    DanglingElse {
        /// The `else` keyword.
        token: TokenIdx,
    },

    /// A control keyword not followed by `(`.
    #[error("expected `(` after control keyword")]
    MissingCondition {
        /// The control keyword.
        token: TokenIdx,
    },

    /// A control statement with nothing after its header.
    #[error("control statement has no body")]
    MissingBody {
        /// The control keyword.
        token: TokenIdx,
    },

    /// Statements nested past [`MAX_NESTING`]; the rest of the enclosing
    /// block is kept as one flat statement.
    #[error("statements nested more than {} levels deep are not resolved", MAX_NESTING)]
    TooDeep {
        /// First token of the unresolved run.
        token: TokenIdx,
    },
}

impl StructureError {
    /// Returns the token the error is reported on.
    #[must_use]
    pub fn token(&self) -> TokenIdx {
        match self {
            Self::UnmatchedClose { token }
            | Self::UnclosedBlock { token }
            | Self::UnclosedParen { token }
            | Self::UnmatchedParen { token }
            | Self::DanglingElse { token }
            | Self::MissingCondition { token }
            | Self::MissingBody { token }
            | Self::TooDeep { token } => *token,
        }
    }
}

/// Deepest statement nesting the resolver builds a tree for.
pub const MAX_NESTING: usize = 256;

/// Keywords that start a new statement; a statement missing its `;` ends
/// before them.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "switch", "do", "case", "default",
];

/// Keywords whose statements are jumps rather than expressions.
const JUMP_KEYWORDS: &[&str] = &["return", "break", "continue", "goto"];

/// Resolves the statement tree of a token stream.
///
/// Returns the top-level items together with every structure error found.
#[must_use]
pub fn resolve(tokens: &[Token<'_>]) -> (Vec<Stmt>, Vec<StructureError>) {
    let mut resolver = Resolver::new(tokens);
    let items = resolver.items();
    (items, resolver.errors)
}

struct Resolver<'a, 'src> {
    tokens: &'a [Token<'src>],
    /// Indices of the non-trivia tokens.
    significant: Vec<TokenIdx>,
    pos: usize,
    /// Statements currently being parsed.
    depth: usize,
    errors: Vec<StructureError>,
}

impl<'a, 'src> Resolver<'a, 'src> {
    fn new(tokens: &'a [Token<'src>]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    fn peek_nth(&self, n: usize) -> Option<(TokenIdx, &'a Token<'src>)> {
        let idx = *self.significant.get(self.pos + n)?;
        self.tokens.get(idx).map(|t| (idx, t))
    }

    fn peek(&self) -> Option<(TokenIdx, &'a Token<'src>)> {
        self.peek_nth(0)
    }

    fn at_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|(_, t)| t.is_punct(p))
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.peek().is_some_and(|(_, t)| t.is_keyword(kw))
    }

    fn bump(&mut self) -> Option<TokenIdx> {
        let idx = self.significant.get(self.pos).copied();
        if idx.is_some() {
            self.pos += 1;
        }
        idx
    }

    /// Last consumed token, or `fallback` if nothing was consumed.
    fn last(&self, fallback: TokenIdx) -> TokenIdx {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.significant.get(i))
            .copied()
            .unwrap_or(fallback)
    }

    fn items(&mut self) -> Vec<Stmt> {
        let mut items = Vec::new();
        while let Some((idx, tok)) = self.peek() {
            if tok.is_punct("}") {
                self.errors.push(StructureError::UnmatchedClose { token: idx });
                self.bump();
                continue;
            }
            items.push(self.stmt());
        }
        items
    }

    /// Parses one statement. The current token must exist and not be `}`.
    fn stmt(&mut self) -> Stmt {
        if self.depth > MAX_NESTING {
            return self.flat();
        }
        self.depth += 1;
        let stmt = self.nested_stmt();
        self.depth -= 1;
        stmt
    }

    fn nested_stmt(&mut self) -> Stmt {
        let Some((idx, tok)) = self.peek() else {
            return Stmt::Empty(self.last(0));
        };
        if tok.is_punct("{") {
            return Stmt::Block(self.block());
        }
        if tok.is_punct(";") {
            self.bump();
            return Stmt::Empty(idx);
        }
        if tok.kind == TokenKind::Keyword {
            match tok.text {
                "if" => return Stmt::If(self.if_stmt()),
                "while" => return Stmt::While(self.conditional(false)),
                "for" => return Stmt::For(self.conditional(true)),
                "switch" => return Stmt::Switch(self.conditional(false)),
                "do" => return Stmt::DoWhile(self.do_while()),
                "case" | "default" => return self.label(),
                "else" => {
                    self.errors.push(StructureError::DanglingElse { token: idx });
                    self.bump();
                    return Stmt::Other(Simple {
                        first: idx,
                        last: idx,
                    });
                }
                _ => {}
            }
        }
        let goto_label = tok.kind == TokenKind::Identifier
            && self.peek_nth(1).is_some_and(|(_, next)| next.is_punct(":"));
        if goto_label {
            return self.label();
        }
        self.simple()
    }

    /// Parses a `{ ... }` block. The current token must be `{`.
    fn block(&mut self) -> Block {
        let open = self.bump().unwrap_or(0);
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.errors.push(StructureError::UnclosedBlock { token: open });
                    return Block {
                        open,
                        close: None,
                        stmts,
                    };
                }
                Some((_, tok)) if tok.is_punct("}") => {
                    let close = self.bump();
                    return Block { open, close, stmts };
                }
                Some(_) => stmts.push(self.stmt()),
            }
        }
    }

    fn if_stmt(&mut self) -> IfStmt {
        let keyword = self.bump().unwrap_or(0);
        let condition = self.condition(keyword, false);
        let then_body = self.body(keyword);
        // The innermost open `if` claims the `else`.
        let else_branch = if self.at_keyword("else") {
            let else_kw = self.bump().unwrap_or(keyword);
            let body = self.body(else_kw);
            Some(ElseBranch {
                keyword: else_kw,
                body,
            })
        } else {
            None
        };
        IfStmt {
            keyword,
            condition,
            then_body,
            else_branch,
        }
    }

    fn conditional(&mut self, allow_semicolons: bool) -> Conditional {
        let keyword = self.bump().unwrap_or(0);
        let condition = self.condition(keyword, allow_semicolons);
        let body = self.body(keyword);
        Conditional {
            keyword,
            condition,
            body,
        }
    }

    fn do_while(&mut self) -> DoWhile {
        let keyword = self.bump().unwrap_or(0);
        let body = self.body(keyword);
        let (while_keyword, condition) = if self.at_keyword("while") {
            let while_kw = self.bump().unwrap_or(keyword);
            let condition = self.condition(while_kw, false);
            (Some(while_kw), condition)
        } else {
            (None, None)
        };
        if self.at_punct(";") {
            self.bump();
        }
        DoWhile {
            keyword,
            body,
            while_keyword,
            condition,
            end: self.last(keyword),
        }
    }

    /// Parses a parenthesized header. `for` headers may contain `;`.
    fn condition(&mut self, keyword: TokenIdx, allow_semicolons: bool) -> Option<Parens> {
        let Some((open, tok)) = self.peek() else {
            self.errors
                .push(StructureError::MissingCondition { token: keyword });
            return None;
        };
        if !tok.is_punct("(") {
            self.errors
                .push(StructureError::MissingCondition { token: keyword });
            return None;
        }
        self.bump();

        let mut depth = 1usize;
        while let Some((idx, tok)) = self.peek() {
            if tok.is_punct("(") {
                depth += 1;
            } else if tok.is_punct(")") {
                depth -= 1;
                if depth == 0 {
                    self.bump();
                    return Some(Parens {
                        open,
                        close: Some(idx),
                    });
                }
            } else if tok.is_punct("{")
                || tok.is_punct("}")
                || (!allow_semicolons && tok.is_punct(";"))
            {
                break;
            }
            self.bump();
        }
        self.errors.push(StructureError::UnclosedParen { token: open });
        Some(Parens { open, close: None })
    }

    fn body(&mut self, owner: TokenIdx) -> Body {
        match self.peek() {
            Some((_, tok)) if tok.is_punct("{") => Body::Block(self.block()),
            Some((_, tok)) if !tok.is_punct("}") => Body::Single(Box::new(self.stmt())),
            _ => {
                self.errors.push(StructureError::MissingBody { token: owner });
                Body::Missing
            }
        }
    }

    /// Parses `case X:`, `default:` or `name:`.
    fn label(&mut self) -> Stmt {
        let first = self.bump().unwrap_or(0);
        while let Some((_, tok)) = self.peek() {
            if tok.is_punct(":") {
                self.bump();
                break;
            }
            if tok.is_punct(";") || tok.is_punct("{") || tok.is_punct("}") {
                break;
            }
            self.bump();
        }
        Stmt::Label(Simple {
            first,
            last: self.last(first),
        })
    }

    /// Scans a declaration, expression or jump statement up to its `;`.
    ///
    /// Also recognizes function definitions (`... ) {`) and the member
    /// block of `struct`/`union` definitions.
    fn simple(&mut self) -> Stmt {
        let start = self.pos;
        let first = self.peek().map_or(0, |(idx, _)| idx);
        let mut parens: Vec<TokenIdx> = Vec::new();
        let mut braces: Vec<TokenIdx> = Vec::new();
        let mut prev: Option<TokenIdx> = None;
        let mut saw_assign = false;
        let mut aggregate = false;
        let mut members: Option<Block> = None;

        while let Some((idx, tok)) = self.peek() {
            let top_level = parens.is_empty() && braces.is_empty();
            if tok.kind == TokenKind::Punct {
                match tok.text {
                    ";" if braces.is_empty() => {
                        self.report_unclosed_paren(&parens);
                        self.bump();
                        parens.clear();
                        break;
                    }
                    "}" if braces.is_empty() => {
                        self.report_unclosed_paren(&parens);
                        parens.clear();
                        break;
                    }
                    "}" => {
                        braces.pop();
                    }
                    "{" if top_level => {
                        let after_paren = prev.is_some_and(|p| self.tokens[p].is_punct(")"));
                        if after_paren && !saw_assign && members.is_none() {
                            let header = Simple {
                                first,
                                last: prev.unwrap_or(first),
                            };
                            let body = self.block();
                            return Stmt::Function(FunctionDef { header, body });
                        }
                        if aggregate && !saw_assign && members.is_none() {
                            members = Some(self.block());
                            prev = Some(self.last(idx));
                            continue;
                        }
                        braces.push(idx);
                    }
                    "{" => braces.push(idx),
                    "(" | "[" => parens.push(idx),
                    ")" | "]" => {
                        if parens.pop().is_none() {
                            self.errors
                                .push(StructureError::UnmatchedParen { token: idx });
                        }
                    }
                    "=" if top_level => saw_assign = true,
                    _ => {}
                }
            } else if tok.kind == TokenKind::Keyword && top_level {
                if STATEMENT_KEYWORDS.contains(&tok.text) && idx != first {
                    break;
                }
                if tok.text == "struct" || tok.text == "union" {
                    aggregate = true;
                }
            }
            prev = Some(idx);
            self.bump();
        }

        if self.peek().is_none() {
            self.report_unclosed_paren(&parens);
            if let Some(&open) = braces.first() {
                self.errors.push(StructureError::UnclosedBlock { token: open });
            }
        }

        let last = self.last(first);
        if members.is_some() || self.starts_declaration(start) {
            return Stmt::Declaration(Declaration {
                first,
                last,
                members,
            });
        }
        let simple = Simple { first, last };
        if self.tokens[first].kind == TokenKind::Keyword
            && JUMP_KEYWORDS.contains(&self.tokens[first].text)
        {
            Stmt::Other(simple)
        } else {
            Stmt::Expression(simple)
        }
    }

    /// Consumes the rest of the enclosing block without building a tree.
    fn flat(&mut self) -> Stmt {
        let first = self.peek().map_or(0, |(idx, _)| idx);
        self.errors.push(StructureError::TooDeep { token: first });
        let mut braces = 0usize;
        while let Some((_, tok)) = self.peek() {
            if tok.is_punct("{") {
                braces += 1;
            } else if tok.is_punct("}") {
                if braces == 0 {
                    break;
                }
                braces -= 1;
            }
            self.bump();
        }
        Stmt::Other(Simple {
            first,
            last: self.last(first),
        })
    }

    fn report_unclosed_paren(&mut self, parens: &[TokenIdx]) {
        if let Some(&open) = parens.first() {
            self.errors.push(StructureError::UnclosedParen { token: open });
        }
    }

    /// Declarations start with a type keyword, `Type name` or `Type *name`.
    fn starts_declaration(&self, start: usize) -> bool {
        let nth = |n: usize| {
            self.significant
                .get(start + n)
                .and_then(|&i| self.tokens.get(i))
        };
        let Some(first) = nth(0) else {
            return false;
        };
        match first.kind {
            TokenKind::Keyword => DECLARATION_KEYWORDS.contains(&first.text),
            TokenKind::Identifier => {
                let mut n = 1;
                while nth(n).is_some_and(|t| t.is_punct("*")) {
                    n += 1;
                }
                nth(n).is_some_and(|t| t.kind == TokenKind::Identifier)
                    && nth(n + 1).is_some_and(|t| {
                        t.is_punct(";")
                            || t.is_punct("=")
                            || t.is_punct(",")
                            || t.is_punct("[")
                            || t.is_punct("(")
                    })
            }
            _ => false,
        }
    }
}
