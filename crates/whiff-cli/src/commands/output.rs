//! Shared output formatting for detection results.

use anyhow::Result;
use whiff::{Violation, ViolationDiagnostic};

use crate::OutputFormat;

/// Prints violations in the requested format.
pub fn print(violations: &[Violation], format: OutputFormat, name: &str, source: &str) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(violations, name),
        OutputFormat::Json => return print_json(violations),
        OutputFormat::Pretty => print_pretty(violations, name, source),
    }
    Ok(())
}

/// Prints the plain per-line report plus a summary.
pub fn print_text(violations: &[Violation], name: &str) {
    for violation in violations {
        println!("{name}: {violation}");
    }
    let repairable = violations.iter().filter(|v| v.repairable).count();
    println!(
        "Found {} smell(s), {} repairable",
        violations.len(),
        repairable
    );
}

fn print_json(violations: &[Violation]) -> Result<()> {
    let json = serde_json::to_string_pretty(violations)?;
    println!("{json}");
    Ok(())
}

fn print_pretty(violations: &[Violation], name: &str, source: &str) {
    for violation in violations {
        let report = miette::Report::new(ViolationDiagnostic::from(violation))
            .with_source_code(miette::NamedSource::new(name, source.to_string()));
        println!("{report:?}");
    }
    println!("Found {} smell(s)", violations.len());
}
