//! Configuration lookup.
//!
//! The first match wins:
//!
//! 1. `--config` flag or `$CSTYLE_CONFIG`
//! 2. `cstyle.toml` or `.cstyle.toml` in the checked directory or the
//!    nearest ancestor that has one
//! 3. `config.toml` in `$CSTYLE_CONFIG_DIR`, else `~/.cstyle/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use cstyle_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found next to the checked files.
    Project(PathBuf),
    /// Found in the per-user config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the configuration, or returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            return Ok(Config::default());
        };
        tracing::info!("Using {self}");
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "config {}", p.display()),
            Self::Project(p) => write!(f, "project config {}", p.display()),
            Self::Global(p) => write!(f, "global config {}", p.display()),
            Self::Default => write!(f, "default config"),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["cstyle.toml", ".cstyle.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for files under `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let start = if project_dir.is_absolute() {
        project_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_or_else(|_| project_dir.to_path_buf(), |cwd| cwd.join(project_dir))
    };
    resolve_from(&start, explicit, global_config_dir())
}

/// Lookup with the global directory passed in, so tests need no env vars.
fn resolve_from(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for dir in project_dir.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(candidate) = found {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// Returns `$CSTYLE_CONFIG_DIR`, else `~/.cstyle`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("CSTYLE_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".cstyle")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstyle_core::Mode;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, content).expect("write");
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let tmp = TempDir::new().expect("tempdir");
        touch(&tmp.path().join("cstyle.toml"), "");

        let explicit = Path::new("/nonexistent/cstyle.toml");
        assert_eq!(
            resolve_from(tmp.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn plain_name_preferred_over_dotfile() {
        let tmp = TempDir::new().expect("tempdir");
        touch(&tmp.path().join(".cstyle.toml"), "");
        assert_eq!(
            resolve_from(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".cstyle.toml"))
        );

        touch(&tmp.path().join("cstyle.toml"), "");
        assert_eq!(
            resolve_from(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("cstyle.toml"))
        );
    }

    #[test]
    fn nearest_ancestor_config_is_used() {
        let tmp = TempDir::new().expect("tempdir");
        touch(&tmp.path().join("cstyle.toml"), "");
        touch(&tmp.path().join("lib/.cstyle.toml"), "");
        let nested = tmp.path().join("lib/src/util");
        fs::create_dir_all(&nested).expect("create dirs");

        assert_eq!(
            resolve_from(&nested, None, None),
            ConfigSource::Project(tmp.path().join("lib/.cstyle.toml"))
        );
    }

    #[test]
    fn global_only_without_project_config() {
        let project = TempDir::new().expect("tempdir");
        let global = TempDir::new().expect("tempdir");
        let global_dir = Some(global.path().to_path_buf());

        assert_eq!(
            resolve_from(project.path(), None, global_dir.clone()),
            ConfigSource::Default
        );

        touch(&global.path().join("config.toml"), "");
        assert_eq!(
            resolve_from(project.path(), None, global_dir.clone()),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        touch(&project.path().join("cstyle.toml"), "");
        assert!(matches!(
            resolve_from(project.path(), None, global_dir),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn load_reads_the_resolved_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("cstyle.toml");
        touch(&path, "mode = \"strict\"\n[style]\nindent_width = 4\n");

        let config = ConfigSource::Project(path).load().expect("config");
        assert_eq!(config.mode, Mode::Strict);
        assert_eq!(config.style.indent_width, Some(4));
        assert_eq!(ConfigSource::Default.load().expect("defaults").mode, Mode::Normal);
    }

    #[test]
    fn load_reports_bad_toml() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("cstyle.toml");
        touch(&path, "mode = [\n");

        let err = ConfigSource::Explicit(path).load().expect_err("invalid");
        assert!(err.to_string().starts_with("Failed to load config"));
    }
}
