//! # cstyle-rules
//!
//! Built-in style rules for cstyle.
//!
//! Each rule is a pure check over one file's tokens and statement tree.
//! Rules declare the modes they run in; strict mode runs every normal rule
//! plus the strict-only ones.
//!
//! ## Available Rules
//!
//! | Code | Name | Mode | Description |
//! |------|------|------|-------------|
//! | CS001 | `keyword-spacing` | normal | Space between a control keyword and `(` |
//! | CS002 | `brace-placement` | normal | `{` on the header line, `} else`, `} while` |
//! | CS003 | `missing-braces` | normal | Braces around every control body |
//! | CS004 | `indentation` | normal | Statements, braces and comments at their structural column |
//! | CS005 | `line-length` | normal | Lines at most 80 columns wide |
//! | CS006 | `excess-blank-lines` | normal | At most 2 consecutive blank lines |
//! | CS007 | `magic-literal` | strict | No unnamed literals inside functions |
//! | CS008 | `trailing-whitespace` | strict | No whitespace at the end of a line |
//! | CS009 | `todo-comment` | strict | No leftover `TODO` comments |
//! | CS010 | `commented-out-code` | strict | No code in line comments |
//! | CS011 | `brace-line-break` | strict | Nothing after `{` or before `}` on its line |
//!
//! ## Usage
//!
//! ```ignore
//! use cstyle_core::{Analyzer, Mode};
//! use cstyle_rules::{Indentation, MissingBraces};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .mode(Mode::Normal)
//!     .rule(MissingBraces::new())
//!     .rule(Indentation::new().indent_width(4))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod brace_line_break;
pub mod brace_placement;
pub mod commented_out_code;
pub mod excess_blank_lines;
pub mod indentation;
pub mod keyword_spacing;
pub mod line_length;
pub mod magic_literal;
pub mod missing_braces;
mod presets;
pub mod todo_comment;
pub mod trailing_whitespace;

pub use brace_line_break::BraceLineBreak;
pub use brace_placement::BracePlacement;
pub use commented_out_code::CommentedOutCode;
pub use excess_blank_lines::ExcessBlankLines;
pub use indentation::Indentation;
pub use keyword_spacing::KeywordSpacing;
pub use line_length::LineLength;
pub use magic_literal::MagicLiteral;
pub use missing_braces::MissingBraces;
pub use presets::{all_rules, configured_rules, normal_rules, strict_rules, Preset};
pub use todo_comment::TodoComment;
pub use trailing_whitespace::TrailingWhitespace;

/// Re-export core types for convenience.
pub use cstyle_core::{Rule, Severity, Violation};
