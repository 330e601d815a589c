//! Repair command implementation.

use anyhow::{Context, Result};
use similar::TextDiff;
use std::path::{Path, PathBuf};
use whiff::{normalize_line_endings, RepairReport, Violation};

use crate::commands::{load_config, read_input};

/// Options for one repair run.
pub struct RepairOptions {
    /// Dockerfile to repair.
    pub file: Option<PathBuf>,
    /// Read from stdin instead of a file.
    pub stdin: bool,
    /// Write the repaired Dockerfile here.
    pub output: Option<PathBuf>,
    /// Rewrite the input file.
    pub in_place: bool,
    /// Suppress the detection report and the diff.
    pub quiet: bool,
    /// Write a unified diff here.
    pub patch: Option<PathBuf>,
    /// Detect without repairing.
    pub detect_only: bool,
    /// Skip the detection report.
    pub repair_only: bool,
}

/// Runs the repair command.
///
/// The repaired Dockerfile goes to the `--output` path, back to the input
/// file with `--in-place`, or to stdout otherwise. Reports and diffs go to
/// stderr so stdout stays pipeable.
pub fn run(opts: &RepairOptions, config: Option<&Path>) -> Result<()> {
    let (name, source) = read_input(opts.file.as_deref(), opts.stdin)?;
    let config = load_config(config)?;

    if opts.detect_only {
        let violations =
            whiff::parse_and_match_with(&source, config).context("failed to analyze input")?;
        if !opts.quiet {
            report_detections(&violations, &name);
        }
        return Ok(());
    }

    let report =
        whiff::repair_source_with(&source, config).context("failed to repair input")?;

    if !opts.quiet && !opts.repair_only {
        report_detections(&report.violations, &name);
        report_outcomes(&report);
    }

    let diff = unified_diff(&name, &source, &report.output);
    if let Some(patch_path) = &opts.patch {
        std::fs::write(patch_path, &diff)
            .with_context(|| format!("failed to write patch {}", patch_path.display()))?;
    } else if !opts.quiet && !diff.is_empty() {
        eprint!("{diff}");
    }

    write_result(opts, &report.output)
}

fn report_detections(violations: &[Violation], name: &str) {
    for violation in violations {
        eprintln!("{name}: {violation}");
    }
    eprintln!("Found {} smell(s)", violations.len());
}

fn report_outcomes(report: &RepairReport) {
    for (violation, outcome) in report.violations.iter().zip(&report.outcomes) {
        eprintln!("  {}: {}", violation.rule, outcome);
    }
    eprintln!(
        "Repaired {} smell(s), {} failed",
        report.repaired_count(),
        report.failed_count()
    );
}

/// A unified diff of the repair, against the EOL-normalized input the
/// repaired text was produced from.
fn unified_diff(name: &str, source: &str, repaired: &str) -> String {
    let original = normalize_line_endings(source);
    if original == repaired {
        return String::new();
    }
    TextDiff::from_lines(original.as_str(), repaired)
        .unified_diff()
        .header(name, name)
        .to_string()
}

fn write_result(opts: &RepairOptions, repaired: &str) -> Result<()> {
    if opts.in_place {
        // conflicts_with(stdin) guarantees a file path here
        let path = opts.file.as_deref().context("--in-place needs a file")?;
        return std::fs::write(path, repaired)
            .with_context(|| format!("failed to write {}", path.display()));
    }
    if let Some(path) = &opts.output {
        return std::fs::write(path, repaired)
            .with_context(|| format!("failed to write {}", path.display()));
    }
    print!("{repaired}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_is_empty_when_nothing_changed() {
        assert_eq!(unified_diff("Dockerfile", "FROM a:1\n", "FROM a:1\n"), "");
    }

    #[test]
    fn diff_carries_the_file_name_header() {
        let diff = unified_diff(
            "Dockerfile",
            "RUN curl http://x\n",
            "RUN curl -f http://x\n",
        );
        assert!(diff.starts_with("--- Dockerfile\n+++ Dockerfile\n"));
        assert!(diff.contains("-RUN curl http://x"));
        assert!(diff.contains("+RUN curl -f http://x"));
    }

    #[test]
    fn diff_compares_against_normalized_input() {
        assert_eq!(unified_diff("Dockerfile", "FROM a:1\r\n", "FROM a:1\n"), "");
    }

    #[test]
    fn write_result_honors_output_path() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let out = dir.path().join("Dockerfile.fixed");
        let opts = RepairOptions {
            file: None,
            stdin: true,
            output: Some(out.clone()),
            in_place: false,
            quiet: true,
            patch: None,
            detect_only: false,
            repair_only: false,
        };
        write_result(&opts, "FROM a:1\n").expect("write failed");
        assert_eq!(std::fs::read_to_string(out).expect("read failed"), "FROM a:1\n");
    }

    #[test]
    fn write_result_in_place_rewrites_the_input() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let input = dir.path().join("Dockerfile");
        std::fs::write(&input, "RUN curl http://x\n").expect("seed failed");
        let opts = RepairOptions {
            file: Some(input.clone()),
            stdin: false,
            output: None,
            in_place: true,
            quiet: true,
            patch: None,
            detect_only: false,
            repair_only: false,
        };
        write_result(&opts, "RUN curl -f http://x\n").expect("write failed");
        assert_eq!(
            std::fs::read_to_string(input).expect("read failed"),
            "RUN curl -f http://x\n"
        );
    }
}
