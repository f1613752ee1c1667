//! C source model: lexer, statement tree, and block structure resolver.
//!
//! [`SourceFile::parse`] runs the whole front end over one file. It never
//! fails; lexical and structural problems are collected on the result.

pub mod lexer;
pub mod resolver;
pub mod token;
pub mod tree;

pub use lexer::{tokenize, LexError, Lexer};
pub use resolver::{resolve, StructureError, MAX_NESTING};
pub use token::{Span, Token, TokenIdx, TokenKind};
pub use tree::{
    walk_block, walk_body, walk_conditional, walk_declaration, walk_do_while, walk_function,
    walk_if, walk_stmt, walk_stmts, Block, Body, Conditional, Declaration, DoWhile, ElseBranch,
    FunctionDef, IfStmt, Parens, Simple, Stmt, Visit,
};

/// A lexed and resolved source file.
#[derive(Debug, Clone)]
pub struct SourceFile<'src> {
    /// The full source text.
    pub source: &'src str,
    /// Every token, trivia included, in source order.
    pub tokens: Vec<Token<'src>>,
    /// Top-level statements.
    pub items: Vec<Stmt>,
    /// Errors recorded by the lexer.
    pub lex_errors: Vec<LexError>,
    /// Errors recorded by the resolver.
    pub structure_errors: Vec<StructureError>,
    line_starts: Vec<usize>,
}

impl<'src> SourceFile<'src> {
    /// Lexes and resolves `source`.
    #[must_use]
    pub fn parse(source: &'src str) -> Self {
        let (tokens, lex_errors) = tokenize(source);
        let (items, structure_errors) = resolve(&tokens);
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            tokens,
            items,
            lex_errors,
            structure_errors,
            line_starts,
        }
    }

    /// Returns the token at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this file's tree.
    #[must_use]
    pub fn token(&self, idx: TokenIdx) -> &Token<'src> {
        &self.tokens[idx]
    }

    /// Number of lines; a trailing newline does not start a new line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self.line_starts.last() {
            Some(&start) if start == self.source.len() => self.line_starts.len() - 1,
            _ => self.line_starts.len(),
        }
    }

    /// Text of a 1-based line without its line terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &'src str {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map_or(self.source.len(), |&next| next - 1);
        let text = self.source.get(start..end).unwrap_or("");
        text.strip_suffix('\r').unwrap_or(text)
    }

    /// Iterates over `(line number, text)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'src str)> + '_ {
        (1..=self.line_count()).map(|line| (line, self.line_text(line)))
    }

    /// Visual 0-based column of the token at `idx`.
    #[must_use]
    pub fn visual_column(&self, idx: TokenIdx, tab_width: usize) -> usize {
        let span = self.tokens[idx].span;
        let start = self.line_starts.get(span.line - 1).copied().unwrap_or(0);
        visual_width(&self.source[start..span.offset], tab_width)
    }

    /// Returns true if only whitespace precedes the token on its line.
    #[must_use]
    pub fn is_line_leading(&self, idx: TokenIdx) -> bool {
        let span = self.tokens[idx].span;
        let start = self.line_starts.get(span.line - 1).copied().unwrap_or(0);
        self.source[start..span.offset]
            .chars()
            .all(|c| c == ' ' || c == '\t')
    }

    /// Next non-trivia token after `idx`.
    #[must_use]
    pub fn next_significant(&self, idx: TokenIdx) -> Option<TokenIdx> {
        (idx + 1..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// Previous non-trivia token before `idx`.
    #[must_use]
    pub fn prev_significant(&self, idx: TokenIdx) -> Option<TokenIdx> {
        (0..idx).rev().find(|&i| !self.tokens[i].kind.is_trivia())
    }
}

/// Visual width of `text` with each tab counted as `tab_width` columns.
#[must_use]
pub fn visual_width(text: &str, tab_width: usize) -> usize {
    text.chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let file = SourceFile::parse("a\r\n\nb;\n");
        assert_eq!(file.line_count(), 3);
        let lines: Vec<_> = file.lines().collect();
        assert_eq!(lines, vec![(1, "a"), (2, ""), (3, "b;")]);
        assert_eq!(file.line_text(4), "");
        assert_eq!(SourceFile::parse("x").line_count(), 1);
        assert_eq!(SourceFile::parse("").line_count(), 0);
    }

    #[test]
    fn test_visual_column_expands_tabs() {
        let file = SourceFile::parse("{\n\t  x;\n}");
        let x = file.tokens.iter().position(|t| t.text == "x");
        assert_eq!(x.map(|i| file.visual_column(i, 2)), Some(4));
        assert_eq!(x.map(|i| file.visual_column(i, 8)), Some(10));
        assert_eq!(x.map(|i| file.is_line_leading(i)), Some(true));
    }

    #[test]
    fn test_significant_neighbours() {
        let file = SourceFile::parse("if /* c */ (x)");
        let paren = file.next_significant(0);
        assert_eq!(paren.map(|i| file.token(i).text), Some("("));
        assert_eq!(paren.and_then(|i| file.prev_significant(i)), Some(0));
    }
}
