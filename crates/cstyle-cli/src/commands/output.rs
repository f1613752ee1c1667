//! Shared output formatting for check results.

use anyhow::Result;
use cstyle_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print check results in the specified format.
///
/// `bases` are the directories reported paths are relative to; the pretty
/// format reads source snippets through them.
pub fn print(result: &LintResult, format: OutputFormat, bases: &[PathBuf]) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Pretty => print_pretty(result, bases),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        for label in &violation.labels {
            println!(
                "  = note: {} ({}:{})",
                label.message, label.location.line, label.location.column
            );
        }
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_pretty(result: &LintResult, bases: &[PathBuf]) {
    for violation in &result.violations {
        let diagnostic = ViolationDiagnostic::from(violation);
        match read_source(violation, bases) {
            Some(source) => {
                let name = violation.location.file.display().to_string();
                let report =
                    Report::new(diagnostic).with_source_code(NamedSource::new(name, source));
                println!("{report:?}");
            }
            None => println!("{violation}"),
        }
    }
    print_summary(result);
}

fn read_source(violation: &Violation, bases: &[PathBuf]) -> Option<String> {
    let file: &Path = &violation.location.file;
    bases
        .iter()
        .map(|base| base.join(file))
        .find(|candidate| candidate.is_file())
        .and_then(|path| std::fs::read_to_string(path).ok())
}
