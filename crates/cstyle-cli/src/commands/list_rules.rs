//! List rules command implementation.

use cstyle_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<20} {:<8} {:<9} Description",
        "Code", "Name", "Mode", "Severity"
    );
    println!("{}", "-".repeat(96));

    for rule in all_rules() {
        println!(
            "{:<7} {:<20} {:<8} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.modes().to_string(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nAlways reported:");
    println!("  CS900  lex-error          unterminated string, character literal or comment");
    println!("  CS901  structure-error    unbalanced braces or parentheses, stray else");
    println!("  CS902  engine-warning     a rule skipped a malformed construct");

    println!("\nModes:");
    println!("  normal  - layout rules (default)");
    println!("  strict  - layout rules plus the strict-only rules");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cstyle check --rules indentation,missing-braces");
    println!("  cstyle check --mode strict --rules CS007,CS011");
}
