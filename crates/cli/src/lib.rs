//! CLI for Benchplot.
//!
//! This crate provides the `benchplot` command-line interface: run a
//! benchmark command, archive its raw output, parse it and write results,
//! a summary and charts.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod runner;
pub mod settings;

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use benchplot_core::{split, Aggregator, FamilyRegistry};
use benchplot_report::io::{read_raw, OutputLayout};
use benchplot_report::{file_stamp, write_all_outputs, Artifacts, BenchRun};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Benchplot CLI.
#[derive(Parser, Debug)]
#[command(name = "benchplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, global = true, env = "BENCHPLOT_CONFIG", default_value = "benchplot.toml")]
    pub config: PathBuf,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the benchmark command, archive its output and chart the results.
    ///
    /// Writes to the output directory:
    /// - bench_<timestamp>.txt and latest.txt - Raw output
    /// - bench_<timestamp>.json and latest.json - Parsed results
    /// - summary.md - Markdown summary
    /// - bench_<timestamp>_<category>_<metric>.svg - Charts
    Run {
        /// Output directory override.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Benchmark command override, e.g. "cargo bench".
        #[arg(short, long)]
        command: Option<String>,
    },

    /// Parse previously captured output without running anything.
    Parse {
        /// Raw output file (default: latest.txt in the output directory).
        #[arg(short, long)]
        raw_file: Option<PathBuf>,

        /// Output directory override.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Show configuration and registered benchmark families.
    Status {
        /// Show detailed status information.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Parse `raw` and write all artifacts of the run stamped `timestamp` into `layout`.
pub fn process(
    raw: &str,
    registry: &FamilyRegistry,
    layout: &OutputLayout,
    timestamp: DateTime<Utc>,
) -> anyhow::Result<Artifacts> {
    let outcome = Aggregator::new(registry.clone())
        .aggregate_with_diagnostics(raw)
        .context("No benchmark results found in output")?;
    for skipped in &outcome.skipped {
        debug!(line = skipped.line_number, reason = ?skipped.reason, "Skipped line");
    }

    let run = BenchRun::at(timestamp, &outcome.records);
    let groups = split(&outcome.records, registry);
    let artifacts = write_all_outputs(layout, &run, &groups)?;
    Ok(artifacts)
}

fn print_artifacts(raw_path: &Path, artifacts: &Artifacts) {
    println!("Benchmark workflow completed:");
    println!("  Raw output: {}", raw_path.display());
    println!("  Parsed JSON: {}", artifacts.results_json.display());
    println!("  Summary: {}", artifacts.summary.display());
    for chart in &artifacts.charts {
        println!("  Chart: {}", chart.display());
    }
}

/// Execute an already parsed command line.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load(&cli.config)?;
    let registry = settings.registry();

    match cli.command {
        Commands::Run {
            output_dir,
            command,
        } => {
            let layout = OutputLayout::new(output_dir.unwrap_or(settings.output_dir));
            let command = match command {
                Some(line) => line.split_whitespace().map(str::to_string).collect(),
                None => settings.command,
            };

            let raw = runner::run_benchmark(&command)?;
            let timestamp = Utc::now();
            let raw_path = layout.write_raw(&raw, &file_stamp(&timestamp))?;

            let artifacts = process(&raw, &registry, &layout, timestamp)?;
            print_artifacts(&raw_path, &artifacts);
            Ok(())
        }
        Commands::Parse {
            raw_file,
            output_dir,
        } => {
            let layout = OutputLayout::new(output_dir.unwrap_or(settings.output_dir));
            let raw_path = raw_file.unwrap_or_else(|| layout.latest_raw_path());
            let raw = read_raw(&raw_path)?;

            let artifacts = process(&raw, &registry, &layout, Utc::now())?;
            print_artifacts(&raw_path, &artifacts);
            Ok(())
        }
        Commands::Status { detailed } => {
            print!("{}", status_report(&settings, &cli.config, detailed));
            Ok(())
        }
    }
}

/// Text printed by the `status` command.
pub fn status_report(settings: &Settings, config: &Path, detailed: bool) -> String {
    let mut out = String::new();
    writeln!(out, "Benchplot").unwrap();
    writeln!(out, "Version: {}", env!("CARGO_PKG_VERSION")).unwrap();
    writeln!(out, "Output directory: {}", settings.output_dir.display()).unwrap();
    writeln!(out, "Benchmark command: {}", settings.command.join(" ")).unwrap();

    if detailed {
        writeln!(out, "\nConfiguration file: {}", config.display()).unwrap();
        writeln!(out, "\nBenchmark families (priority order):").unwrap();
        for family in settings.registry().families() {
            writeln!(out, "  - {} -> {}", family.prefix, family.label).unwrap();
        }
    }

    out
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);
    execute(cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
parquet_encoding_varint file size: 2048 bytes (2.00 KB)
parquet_encoding_varint
                        time:   [1.0000 ms 1.1000 ms 1.2000 ms]
decode_varint           time:   [10.000 us 12.000 us 14.000 us]
";

    fn args(parts: &[PathBuf]) -> Vec<std::ffi::OsString> {
        parts.iter().map(|p| p.clone().into_os_string()).collect()
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from(["benchplot", "-v", "run", "-o", "out", "-c", "cargo bench"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                output_dir,
                command,
            } => {
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(command.as_deref(), Some("cargo bench"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_parse_arguments() {
        let cli = Cli::try_parse_from(["benchplot", "parse", "--raw-file", "x.txt", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(matches!(
            cli.command,
            Commands::Parse { raw_file: Some(ref p), output_dir: None } if p == Path::new("x.txt")
        ));
    }

    #[test]
    fn test_process_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let artifacts = process(OUTPUT, &FamilyRegistry::parquet_encoding(), &layout, Utc::now()).unwrap();
        assert!(artifacts.results_json.exists());
        assert_eq!(artifacts.charts.len(), 3);
    }

    #[test]
    fn test_process_rejects_non_benchmark_output() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let err = process(
            "error[E0425]: cannot find value\n",
            &FamilyRegistry::parquet_encoding(),
            &layout,
            Utc::now(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse benchmark results"));
    }

    #[test]
    fn test_execute_parse_from_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("capture.txt");
        std::fs::write(&raw, OUTPUT).unwrap();
        let out = dir.path().join("out");

        let cli = Cli::try_parse_from(args(&[
            "benchplot".into(),
            "--config".into(),
            dir.path().join("none.toml").into(),
            "parse".into(),
            "--raw-file".into(),
            raw.clone().into(),
            "--output-dir".into(),
            out.clone().into(),
        ]))
        .unwrap();
        execute(cli).unwrap();

        assert!(out.join("latest.json").exists());
        assert!(out.join("summary.md").exists());
    }

    #[test]
    fn test_execute_parse_without_capture_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(args(&[
            "benchplot".into(),
            "--config".into(),
            dir.path().join("none.toml").into(),
            "parse".into(),
            "-o".into(),
            dir.path().to_path_buf(),
        ]))
        .unwrap();
        assert!(execute(cli).is_err());
    }

    #[test]
    fn test_execute_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("benchplot.toml");
        std::fs::write(
            &config,
            "command = [\"cargo\", \"bench\"]\n\n[[families]]\nprefix = \"foo_\"\nlabel = \"foo\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from(args(&[
            "benchplot".into(),
            "--config".into(),
            config,
            "status".into(),
            "--detailed".into(),
        ]))
        .unwrap();
        assert!(matches!(cli.command, Commands::Status { detailed: true }));

        let settings = Settings::load(&cli.config).unwrap();
        let report = status_report(&settings, &cli.config, true);
        assert!(report.contains("Benchmark command: cargo bench"));
        assert!(report.contains("Benchmark families (priority order):"));
        assert!(report.contains("  - foo_ -> foo"));
        assert!(!status_report(&settings, &cli.config, false).contains("families"));

        execute(cli).unwrap();
    }
}
