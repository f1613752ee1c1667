//! Core analyzer for orchestrating style checks over many files.

use crate::config::Config;
use crate::context::FileContext;
use crate::engine::Engine;
use crate::rule::{Mode, Rule, RuleBox};
use crate::types::{LintResult, Violation};

use rayon::prelude::*;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Exclude patterns used when none are configured.
const DEFAULT_EXCLUDES: &[&str] = &["**/build/**", "**/.git/**"];

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading a file or walking a directory.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error walking the directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    mode: Option<Mode>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory or single file to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the configured checking mode.
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or
    /// an exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            let cwd = std::env::current_dir().map_err(|source| AnalyzerError::Io {
                path: root.clone(),
                source,
            })?;
            cwd.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        // Add default excludes if none specified
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(DEFAULT_EXCLUDES.iter().map(ToString::to_string));
        }

        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mode = self.mode.unwrap_or(config.mode);
        let base = if root.is_file() {
            root.parent().map_or_else(|| root.clone(), Path::to_path_buf)
        } else {
            root.clone()
        };

        Ok(Analyzer {
            root,
            base,
            mode,
            excludes,
            engine: Engine::new(self.rules, config),
        })
    }
}

/// The main analyzer that orchestrates style checks.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    /// Directory reported paths are relative to.
    base: PathBuf,
    mode: Mode,
    excludes: Vec<glob::Pattern>,
    engine: Engine,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active checking mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the number of rules active in the current mode.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.active_rules(self.mode).count()
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.engine.config()
    }

    /// Analyzes all files and returns the results.
    ///
    /// Files are checked in parallel; the result is ordered by path, then
    /// by position within each file.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or
    /// the worker pool cannot be created.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting {} analysis at {:?}", self.mode, self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let check_all = || -> Vec<Result<Vec<Violation>, AnalyzerError>> {
            files.par_iter().map(|path| self.analyze_file(path)).collect()
        };
        let outcomes = match self.config().analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(check_all),
            None => check_all(),
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            result.violations.extend(outcome?);
            result.files_checked += 1;
        }
        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Checks in-memory content as if it were the file at `path`.
    #[must_use]
    pub fn check_source(&self, path: &Path, content: &str) -> Vec<Violation> {
        let ctx = self.context(path, content);
        self.engine.check(&ctx)
    }

    fn context<'a>(&self, path: &'a Path, content: &'a str) -> FileContext<'a> {
        FileContext::new(path, content, &self.base)
            .with_mode(self.mode)
            .with_style(self.config().style)
    }

    /// Analyzes a single file and returns violations.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| {
            warn!("Cannot read {}: {}", path.display(), source);
            AnalyzerError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            warn!("{} is not valid UTF-8, checking it lossily", path.display());
        }

        Ok(self.check_source(path, &content))
    }

    /// Discovers all source files to analyze, sorted by path.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        if !self.root.exists() {
            return Err(AnalyzerError::Io {
                path: self.root.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config().analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.has_source_extension(path)
            {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config()
                    .analyzer
                    .extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.') == ext)
            })
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}
