//! Check command implementation.

use anyhow::{Context, Result};
use cstyle_core::{Analyzer, Config, LintResult, Mode, RuleBox};
use cstyle_rules::configured_rules;
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::OutputFormat;

/// Options of one `check` invocation.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Files or directories to check.
    pub paths: Vec<PathBuf>,
    /// Mode override.
    pub mode: Option<Mode>,
    /// Report format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Indentation unit override.
    pub indent: Option<usize>,
    /// Worker thread override.
    pub jobs: Option<usize>,
}

/// Runs the check command.
///
/// Returns `true` when a violation reaches the configured failure
/// threshold.
pub fn run(options: &CheckOptions, explicit_config: Option<&Path>) -> Result<bool> {
    let first = options.paths.first().map_or(Path::new("."), PathBuf::as_path);
    let source = config_resolver::resolve(&project_dir(first), explicit_config);
    let config = apply_overrides(source.load()?, options);

    let mut result = LintResult::new();
    let mut bases = Vec::with_capacity(options.paths.len());
    for path in &options.paths {
        let mut builder = Analyzer::builder()
            .root(path)
            .config(config.clone())
            .excludes(options.exclude.iter().cloned());
        if let Some(mode) = options.mode {
            builder = builder.mode(mode);
        }
        for rule in select_rules(&config, options.rules.as_deref()) {
            builder = builder.rule_box(rule);
        }

        let analyzer = builder.build().context("Failed to build analyzer")?;
        tracing::info!(
            "Checking {} in {} mode with {} rules",
            path.display(),
            analyzer.mode(),
            analyzer.rule_count()
        );

        let found = analyzer
            .analyze()
            .with_context(|| format!("Failed to check {}", path.display()))?;
        result.extend(found);
        bases.push(report_base(path));
    }

    super::output::print(&result, options.format, &bases)?;

    Ok(result.has_violations_at(config.fail_threshold()))
}

fn apply_overrides(mut config: Config, options: &CheckOptions) -> Config {
    if let Some(indent) = options.indent {
        config.style.indent_width = Some(indent);
    }
    if let Some(jobs) = options.jobs {
        config.analyzer.parallelism = Some(jobs);
    }
    config
}

/// Directory searched for a project config file.
fn project_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        report_base(path)
    } else {
        path.to_path_buf()
    }
}

/// Directory reported paths are relative to.
fn report_base(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent().map_or_else(PathBuf::new, Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}

/// Returns the configured rules, narrowed to `filter` when given.
fn select_rules(config: &Config, filter: Option<&str>) -> Vec<RuleBox> {
    let rules = configured_rules(config);
    let Some(filter) = filter else {
        return rules;
    };

    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    for name in &wanted {
        if !rules.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    rules
        .into_iter()
        .filter(|r| wanted.contains(&r.name()) || wanted.contains(&r.code()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn rules_filter_accepts_names_and_codes() {
        let config = Config::default();
        let rules = select_rules(&config, Some("CS005, keyword-spacing,no-such-rule"));
        assert_eq!(names(&rules), vec!["keyword-spacing", "line-length"]);
    }

    #[test]
    fn no_filter_keeps_every_rule() {
        let config = Config::default();
        assert_eq!(select_rules(&config, None).len(), 11);
    }

    #[test]
    fn flags_override_config() {
        let options = CheckOptions {
            paths: vec![PathBuf::from(".")],
            mode: None,
            format: OutputFormat::Compact,
            rules: None,
            exclude: Vec::new(),
            indent: Some(4),
            jobs: Some(2),
        };
        let config = apply_overrides(Config::default(), &options);
        assert_eq!(config.style.indent_width, Some(4));
        assert_eq!(config.analyzer.parallelism, Some(2));
    }
}
