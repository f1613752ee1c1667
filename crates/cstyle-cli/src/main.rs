//! cstyle CLI tool.
//!
//! Usage:
//! ```bash
//! cstyle check [OPTIONS] [PATHS]...
//! cstyle list-rules
//! cstyle init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use cstyle_core::Mode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Layout style checker for C source files
#[derive(Parser)]
#[command(name = "cstyle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CSTYLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check C files for style violations
    Check {
        /// Files or directories to check (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Checking mode: normal or strict (overrides the config file)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Indentation unit in columns (disables per-file detection)
        #[arg(long)]
        indent: Option<usize>,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// One-line-per-violation compact format.
    Compact,
    /// JSON output.
    Json,
    /// Source snippets with labels.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            mode,
            format,
            rules,
            exclude,
            indent,
            jobs,
        } => {
            let options = commands::check::CheckOptions {
                paths,
                mode,
                format,
                rules,
                exclude,
                indent,
                jobs,
            };
            let failed = commands::check::run(&options, cli.config.as_deref())?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
