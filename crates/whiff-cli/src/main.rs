//! whiff CLI tool.
//!
//! Usage:
//! ```bash
//! whiff analyze Dockerfile
//! whiff repair Dockerfile -o Dockerfile.fixed
//! whiff rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Dockerfile smell detection and automatic repair
#[derive(Parser)]
#[command(name = "whiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file (default: ./whiff.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report smells without repairing
    Analyze {
        /// Dockerfile to analyze
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read the Dockerfile from standard input
        #[arg(long)]
        stdin: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Detect smells and repair the repairable ones
    Repair {
        /// Dockerfile to repair
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read the Dockerfile from standard input
        #[arg(long, conflicts_with = "in_place")]
        stdin: bool,

        /// Write the repaired Dockerfile to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewrite the input file in place
        #[arg(short, long)]
        in_place: bool,

        /// Suppress the detection report and the diff
        #[arg(short, long)]
        quiet: bool,

        /// Write a unified diff to this path
        #[arg(short, long)]
        patch: Option<PathBuf>,

        /// Report smells but apply no repair
        #[arg(long, conflicts_with = "repair_only")]
        detect_only: bool,

        /// Repair without printing the detection report
        #[arg(long)]
        repair_only: bool,
    },

    /// List available rules
    Rules,
}

/// Output format for detection results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per violation.
    #[default]
    Text,
    /// JSON array of violations.
    Json,
    /// Rich diagnostics rendered against the source.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            stdin,
            format,
        } => commands::analyze::run(file.as_deref(), stdin, format, cli.config.as_deref()),
        Commands::Repair {
            file,
            stdin,
            output,
            in_place,
            quiet,
            patch,
            detect_only,
            repair_only,
        } => commands::repair::run(
            &commands::repair::RepairOptions {
                file,
                stdin,
                output,
                in_place,
                quiet,
                patch,
                detect_only,
                repair_only,
            },
            cli.config.as_deref(),
        ),
        Commands::Rules => {
            commands::rules::run();
            Ok(())
        }
    }
}
