//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_FILE: &str = "cstyle.toml";

const DEFAULT_CONFIG: &str = r#"# cstyle configuration

# Checking mode: "normal" (layout rules) or "strict" (adds the strict-only rules)
mode = "normal"

# Minimum severity that makes `cstyle check` exit with status 1
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/third_party/**",
]

# File extensions to check
extensions = ["c", "h"]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

[style]
# Columns a tab counts for
tab_width = 2
# Indentation unit; detected per file when omitted
# indent_width = 2

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.line-length]
enabled = true
# severity = "error"  # Override default severity
max = 80

[rules.excess-blank-lines]
max = 2

# [rules.magic-literal]
# allow = ["2", "\"%d\\n\""]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: cstyle check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
