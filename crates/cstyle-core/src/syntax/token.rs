//! Token types produced by the lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a token inside [`SourceFile::tokens`](super::SourceFile::tokens).
pub type TokenIdx = usize;

/// Classification of a lexed token.
///
/// Trivia (whitespace and comments) is kept in the stream so that rules
/// looking at spacing and comment placement can see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// Reserved C keyword (`if`, `int`, `return`, ...).
    Keyword,
    /// Identifier.
    Identifier,
    /// Numeric literal (preprocessing-number syntax).
    Number,
    /// String literal, possibly joined across a line splice.
    String,
    /// Character literal.
    Char,
    /// Operator or punctuation.
    Punct,
    /// `// ...` comment.
    LineComment,
    /// `/* ... */` comment.
    BlockComment,
    /// Run of whitespace, newlines, and line splices.
    Whitespace,
    /// Preprocessor directive line (`#include`, `#define`, ...).
    Directive,
    /// Any character the lexer does not recognize.
    Unknown,
}

impl TokenKind {
    /// Returns true for tokens that never affect structure.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment | Self::Directive
        )
    }

    /// Returns true for comment tokens.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Returns true for numeric, string, and character literals.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Char)
    }
}

/// Byte and line/column position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first byte.
    pub offset: usize,
    /// Length in bytes.
    pub len: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
}

impl Span {
    /// Byte offset one past the last byte.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// A single lexed token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// Token classification.
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub text: &'src str,
    /// Position in the source.
    pub span: Span,
}

impl Token<'_> {
    /// Line of the token's first character.
    #[must_use]
    pub fn line(&self) -> usize {
        self.span.line
    }

    /// Line of the token's last character.
    #[must_use]
    pub fn end_line(&self) -> usize {
        let body = self.text.strip_suffix('\n').unwrap_or(self.text);
        self.span.line + body.matches('\n').count()
    }

    /// Returns true if this is the punctuation `p`.
    #[must_use]
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// Returns true if this is the keyword `kw`.
    #[must_use]
    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    /// Returns true for `if`, `while`, `for`, and `switch`.
    #[must_use]
    pub fn is_control_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword && CONTROL_KEYWORDS.contains(&self.text)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} at {}:{}", self.kind, self.text, self.span.line, self.span.column)
    }
}

/// Keywords that take a parenthesized condition.
pub const CONTROL_KEYWORDS: &[&str] = &["if", "while", "for", "switch"];

/// Reserved words of C11 plus the common C23 spellings.
pub const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic", "_Bool",
    "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert", "_Thread_local",
    "alignas", "alignof", "bool", "constexpr", "nullptr", "static_assert", "thread_local",
];

/// Keywords that can begin a declaration.
pub const DECLARATION_KEYWORDS: &[&str] = &[
    "auto", "char", "const", "double", "enum", "extern", "float", "inline", "int", "long",
    "register", "restrict", "short", "signed", "static", "struct", "typedef", "union", "unsigned",
    "void", "volatile", "_Alignas", "_Atomic", "_Bool", "_Complex", "_Noreturn", "_Thread_local",
    "alignas", "bool", "constexpr", "thread_local",
];
