//! Rules listing command implementation.

use whiff::rules::{binnacle_rules, hadolint_rules, whiff_rules, RuleBox};

/// Runs the rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<32} {:<6} Description", "Group", "Name", "Fix");
    println!("{}", "-".repeat(90));

    for rule in binnacle_rules()
        .into_iter()
        .chain(hadolint_rules())
        .chain(whiff_rules())
    {
        print_rule(&rule);
    }

    println!("\nDisable rules via whiff.toml:");
    println!("  [rules.no-sudo]");
    println!("  enabled = false");
}

fn print_rule(rule: &RuleBox) {
    let fix = if rule.supports_repair() { "yes" } else { "no" };
    println!(
        "{:<10} {:<32} {:<6} {}",
        rule.group().to_string(),
        rule.name(),
        fix,
        rule.description()
    );
}
