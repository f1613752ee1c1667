//! Rule trait and checking modes.

use crate::context::FileContext;
use crate::syntax::SourceFile;
use crate::types::{Severity, Violation};
use serde::{Deserialize, Serialize};

/// Checking mode selected for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Layout rules only.
    #[default]
    Normal,
    /// Layout rules plus the strict-only rules.
    Strict,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown mode `{other}` (expected normal or strict)")),
        }
    }
}

/// Set of modes a rule is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeSet(u8);

impl ModeSet {
    /// Active in normal mode only.
    pub const NORMAL: Self = Self(0b01);
    /// Active in strict mode only.
    pub const STRICT: Self = Self(0b10);
    /// Active in every mode.
    pub const ALL: Self = Self(0b11);

    /// Returns true if the set contains `mode`.
    #[must_use]
    pub fn contains(self, mode: Mode) -> bool {
        let bit = match mode {
            Mode::Normal => Self::NORMAL.0,
            Mode::Strict => Self::STRICT.0,
        };
        self.0 & bit != 0
    }
}

impl std::ops::BitOr for ModeSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::fmt::Display for ModeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.contains(Mode::Normal), self.contains(Mode::Strict)) {
            (true, true) => write!(f, "normal"),
            (false, true) => write!(f, "strict"),
            (true, false) => write!(f, "normal-only"),
            (false, false) => write!(f, "never"),
        }
    }
}

/// A per-file style rule.
///
/// Rules are pure: they read the token stream and statement tree of one
/// file and return violations, never mutating either.
///
/// # Example
///
/// ```ignore
/// use cstyle_core::{FileContext, Rule, SourceFile, Violation};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "CS100" }
///
///     fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation> {
///         file.tokens
///             .iter()
///             .enumerate()
///             .filter(|(_, t)| t.is_keyword("goto"))
///             .map(|(i, _)| ctx.violation(self, file, i, "avoid `goto`"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "keyword-spacing").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Modes in which this rule runs.
    ///
    /// Rules active in normal mode must also be active in strict mode.
    fn modes(&self) -> ModeSet {
        ModeSet::ALL
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, file: &SourceFile) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
