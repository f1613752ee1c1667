//! Configuration types for cstyle.

use crate::rule::Mode;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for cstyle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Checking mode (default: "normal").
    #[serde(default)]
    pub mode: Mode,

    /// Severity threshold for a failing run (default: "error").
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Layout settings shared by several rules.
    #[serde(default)]
    pub style: StyleConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Disables a rule, as `[rules.<name>] enabled = false` would.
    pub fn disable_rule(&mut self, rule_name: &str) {
        self.rules.entry(rule_name.to_string()).or_default().enabled = Some(false);
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration table of a rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Minimum severity that makes a run fail.
    #[must_use]
    pub fn fail_threshold(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File extensions to check.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Number of worker threads (default: one per core).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            extensions: default_extensions(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["c".to_string(), "h".to_string()]
}

fn default_true() -> bool {
    true
}

/// Layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Columns a tab character counts for.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Indentation unit; detected per file when absent.
    #[serde(default)]
    pub indent_width: Option<usize>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            indent_width: None,
        }
    }
}

fn default_tab_width() -> usize {
    2
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a non-negative integer option with a default value.
    #[must_use]
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Normal);
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.extensions, vec!["c", "h"]);
        assert_eq!(config.style.tab_width, 2);
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
mode = "strict"
fail_on = "warning"

[analyzer]
root = "./src"
exclude = ["**/generated/**"]
parallelism = 2

[style]
tab_width = 4
indent_width = 4

[rules.magic-literal]
severity = "warning"
allow = ["2", "\"%d\\n\""]

[rules.line-length]
max = 100

[rules.todo-comment]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.mode, Mode::Strict);
        assert_eq!(config.fail_threshold(), Severity::Warning);
        assert_eq!(config.analyzer.root, PathBuf::from("./src"));
        assert_eq!(config.analyzer.parallelism, Some(2));
        assert_eq!(config.style.indent_width, Some(4));
        assert!(config.is_rule_enabled("magic-literal"));
        assert!(!config.is_rule_enabled("todo-comment"));
        assert_eq!(
            config.rule_severity("magic-literal"),
            Some(Severity::Warning)
        );

        let magic = config.rule_config("magic-literal").expect("table present");
        assert_eq!(magic.get_str_array("allow"), vec!["2", "\"%d\\n\""]);
        let length = config.rule_config("line-length").expect("table present");
        assert_eq!(length.get_usize("max", 80), 100);
        assert_eq!(length.get_int("missing", 7), 7);
    }

    #[test]
    fn test_disable_rule() {
        let mut config = Config::default();
        config.disable_rule("indentation");
        assert!(!config.is_rule_enabled("indentation"));
        assert!(config.is_rule_enabled("missing-braces"));
    }

    #[test]
    fn test_invalid_mode_is_parse_error() {
        let err = Config::parse("mode = \"lenient\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
