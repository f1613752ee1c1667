//! # cstyle-core
//!
//! Core engine for checking the layout style of C source files.
//!
//! This crate provides the front end and the evaluation machinery:
//!
//! - [`syntax`]: a lossless lexer and a block structure resolver that
//!   recovers statements, blocks and unbraced bodies from tokens
//! - [`Rule`] trait for per-file style rules, gated by [`Mode`]
//! - [`Engine`] for evaluating a rule registry against one file
//! - [`Analyzer`] for checking a directory tree in parallel
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use cstyle_core::{Analyzer, Mode};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .mode(Mode::Strict)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allowance;
mod analyzer;
mod config;
mod context;
mod engine;
mod rule;
mod types;

pub mod syntax;

pub use allowance::{AllowDirective, Allowances};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig, StyleConfig};
pub use context::FileContext;
pub use engine::{
    Engine, ENGINE_WARNING_CODE, ENGINE_WARNING_NAME, LEX_ERROR_CODE, LEX_ERROR_NAME,
    STRUCTURE_ERROR_CODE, STRUCTURE_ERROR_NAME,
};
pub use rule::{Mode, ModeSet, Rule, RuleBox};
pub use syntax::SourceFile;
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
