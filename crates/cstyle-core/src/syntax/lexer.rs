//! Lexer (tokenizer) for C source code.
//!
//! Converts raw source text into a [`Token`] stream whose spans exactly
//! partition the input: whitespace, comments, and preprocessor lines are
//! kept as trivia tokens instead of being discarded.
//!
//! Unterminated literals and comments are recorded as [`LexError`]s and the
//! offending token is cut at the end of its line, so lexing always reaches
//! the end of the input.

use super::token::{Span, Token, TokenKind, KEYWORDS};
use thiserror::Error;

/// Lexer error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal is missing its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString {
        /// Span of the recovered token.
        span: Span,
    },

    /// A character literal is missing its closing quote.
    #[error("unterminated character literal")]
    UnterminatedChar {
        /// Span of the recovered token.
        span: Span,
    },

    /// A block comment is missing its closing `*/`.
    #[error("unterminated block comment")]
    UnterminatedComment {
        /// Span of the recovered token.
        span: Span,
    },
}

impl LexError {
    /// Returns the span of the token the error was recorded on.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::UnterminatedString { span }
            | Self::UnterminatedChar { span }
            | Self::UnterminatedComment { span } => *span,
        }
    }
}

/// Three-character operators, checked before shorter ones.
const PUNCT3: &[&str] = &["<<=", ">>=", "..."];

/// Two-character operators.
const PUNCT2: &[&str] = &[
    "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "##",
];

/// Lazy lexer over a C source string.
///
/// Iterating yields tokens in source order; errors accumulate on the lexer
/// and can be taken with [`Lexer::into_errors`]. Cloning a lexer restarts
/// from its current position.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    line_has_token: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            line_has_token: false,
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Consumes the lexer and returns the recorded errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        let Some(&b) = self.bytes.get(self.pos) else {
            return;
        };
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            self.column += 1;
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    /// Advances over one full UTF-8 character.
    fn bump_char(&mut self) {
        self.bump();
        while self.peek_at(0).is_some_and(|b| b & 0xC0 == 0x80) {
            self.bump();
        }
    }

    /// Length of a backslash-newline splice starting at `at`, if any.
    fn splice_len(&self, at: usize) -> Option<usize> {
        match (self.bytes.get(at), self.bytes.get(at + 1), self.bytes.get(at + 2)) {
            (Some(b'\\'), Some(b'\n'), _) => Some(2),
            (Some(b'\\'), Some(b'\r'), Some(b'\n')) => Some(3),
            _ => None,
        }
    }

    fn whitespace(&mut self) {
        loop {
            match self.peek_at(0) {
                Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C) => self.bump(),
                Some(b'\\') => match self.splice_len(self.pos) {
                    Some(n) => self.bump_n(n),
                    None => break,
                },
                _ => break,
            }
        }
    }

    fn line_comment(&mut self) {
        while let Some(b) = self.peek_at(0) {
            if b == b'\n' {
                break;
            }
            if let Some(n) = self.splice_len(self.pos) {
                self.bump_n(n);
                continue;
            }
            self.bump();
        }
    }

    /// Consumes a block comment; returns false if it is unterminated.
    fn block_comment(&mut self) -> bool {
        let close = self.src[self.pos + 2..].find("*/");
        if let Some(rel) = close {
            self.bump_n(rel + 4);
            true
        } else {
            // Recovery: the comment ends with its first line.
            while self.peek_at(0).is_some_and(|b| b != b'\n') {
                self.bump();
            }
            false
        }
    }

    /// Consumes a quoted literal; returns false if it is unterminated.
    ///
    /// A string followed by `\` and a newline, then another string, is
    /// joined into a single literal.
    fn quoted(&mut self, quote: u8) -> bool {
        self.bump();
        loop {
            match self.peek_at(0) {
                None | Some(b'\n') => return false,
                Some(b'\\') => {
                    if let Some(n) = self.splice_len(self.pos) {
                        self.bump_n(n);
                    } else {
                        self.bump();
                        if self.peek_at(0).is_some_and(|b| b != b'\n') {
                            self.bump_char();
                        }
                    }
                }
                Some(b) if b == quote => {
                    self.bump();
                    if quote == b'"' && self.continued_string() {
                        continue;
                    }
                    return true;
                }
                Some(_) => self.bump(),
            }
        }
    }

    /// If the next line continues this string after a trailing backslash,
    /// advances onto its opening quote's content and returns true.
    fn continued_string(&mut self) -> bool {
        let mut at = self.pos;
        while matches!(self.bytes.get(at), Some(b' ' | b'\t')) {
            at += 1;
        }
        let Some(n) = self.splice_len(at) else {
            return false;
        };
        at += n;
        while matches!(self.bytes.get(at), Some(b' ' | b'\t')) {
            at += 1;
        }
        if self.bytes.get(at) != Some(&b'"') {
            return false;
        }
        self.bump_n(at + 1 - self.pos);
        true
    }

    /// Consumes a directive to the end of its (possibly spliced) line,
    /// stopping before a trailing comment.
    fn directive(&mut self) {
        let mut in_quote = false;
        while let Some(b) = self.peek_at(0) {
            match b {
                b'\n' => break,
                b'\\' => {
                    if let Some(n) = self.splice_len(self.pos) {
                        self.bump_n(n);
                    } else {
                        self.bump();
                        if in_quote && self.peek_at(0).is_some_and(|b| b != b'\n') {
                            self.bump_char();
                        }
                    }
                }
                b'"' => {
                    in_quote = !in_quote;
                    self.bump();
                }
                b'/' if !in_quote && matches!(self.peek_at(1), Some(b'/' | b'*')) => break,
                _ => self.bump(),
            }
        }
    }

    fn number(&mut self) {
        while let Some(b) = self.peek_at(0) {
            let exponent = matches!(b, b'e' | b'E' | b'p' | b'P')
                && matches!(self.peek_at(1), Some(b'+' | b'-'));
            if exponent {
                self.bump_n(2);
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.bump();
            } else if b == b'\'' && self.peek_at(1).is_some_and(|d| d.is_ascii_alphanumeric()) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn identifier(&mut self) {
        while self
            .peek_at(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.bump();
        }
    }

    fn punct(&mut self) {
        let rest = &self.src[self.pos..];
        let len = PUNCT3
            .iter()
            .chain(PUNCT2)
            .find(|p| rest.starts_with(*p))
            .map_or(1, |p| p.len());
        self.bump_n(len);
    }

    fn record(&mut self, kind: TokenKind, span: Span) {
        let err = match kind {
            TokenKind::String => LexError::UnterminatedString { span },
            TokenKind::Char => LexError::UnterminatedChar { span },
            _ => LexError::UnterminatedComment { span },
        };
        self.errors.push(err);
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        let first = self.peek_at(0)?;
        let (start, line, column) = (self.pos, self.line, self.column);
        let mut unterminated = false;

        let kind = match first {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C => {
                self.whitespace();
                TokenKind::Whitespace
            }
            b'\\' if self.splice_len(self.pos).is_some() => {
                self.whitespace();
                TokenKind::Whitespace
            }
            b'/' if self.peek_at(1) == Some(b'/') => {
                self.line_comment();
                TokenKind::LineComment
            }
            b'/' if self.peek_at(1) == Some(b'*') => {
                unterminated = !self.block_comment();
                TokenKind::BlockComment
            }
            b'#' if !self.line_has_token => {
                self.directive();
                TokenKind::Directive
            }
            b'"' => {
                unterminated = !self.quoted(b'"');
                TokenKind::String
            }
            b'\'' => {
                unterminated = !self.quoted(b'\'');
                TokenKind::Char
            }
            b'0'..=b'9' => {
                self.number();
                TokenKind::Number
            }
            b'.' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.number();
                TokenKind::Number
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                self.identifier();
                let word = &self.src[start..self.pos];
                let prefix = matches!(word, "L" | "u" | "U" | "u8");
                match self.peek_at(0) {
                    Some(q @ (b'"' | b'\'')) if prefix => {
                        unterminated = !self.quoted(q);
                        if q == b'"' {
                            TokenKind::String
                        } else {
                            TokenKind::Char
                        }
                    }
                    _ if KEYWORDS.contains(&word) => TokenKind::Keyword,
                    _ => TokenKind::Identifier,
                }
            }
            b if b.is_ascii() && !b.is_ascii_control() => {
                self.punct();
                TokenKind::Punct
            }
            _ => {
                self.bump_char();
                TokenKind::Unknown
            }
        };

        let span = Span {
            offset: start,
            len: self.pos - start,
            line,
            column,
        };
        if unterminated {
            self.record(kind, span);
        }

        let text = &self.src[start..self.pos];
        if kind == TokenKind::Whitespace {
            if text.contains('\n') {
                self.line_has_token = false;
            }
        } else {
            self.line_has_token = true;
        }

        Some(Token { kind, text, span })
    }
}

/// Lexes the whole input, returning every token and the recorded errors.
#[must_use]
pub fn tokenize(src: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut lexer = Lexer::new(src);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.into_errors())
}
