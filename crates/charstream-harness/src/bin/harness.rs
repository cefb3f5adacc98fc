//! CLI entrypoint for the charstream conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use charstream_harness::fixtures::{FixtureSet, builtin_set};
use charstream_harness::report::{build_report, render_markdown, render_plain};
use charstream_harness::runner::run_set;
use charstream_harness::HarnessError;

/// Conformance tooling for the charstream stack.
#[derive(Debug, Parser)]
#[command(name = "charstream-harness")]
#[command(about = "Fixture-driven conformance harness for charstream")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run fixture cases and report pass/fail per case.
    Verify {
        /// Fixture JSON file (defaults to the built-in numeric set).
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Only run cases whose name contains this substring.
        #[arg(long)]
        filter: Option<String>,
        /// Output format: `plain`, `markdown`, or `json`.
        #[arg(long, default_value = "plain")]
        format: String,
        /// Output file path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the cases in a fixture set without running them.
    List {
        /// Fixture JSON file (defaults to the built-in numeric set).
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
    /// Write the built-in fixture set out as JSON.
    Export {
        /// Output file path.
        #[arg(long)]
        output: PathBuf,
    },
}

fn load_set(path: Option<&PathBuf>) -> Result<FixtureSet, HarnessError> {
    match path {
        Some(p) => FixtureSet::from_file(p),
        None => Ok(builtin_set()),
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Verify {
            fixtures,
            filter,
            format,
            output,
        } => {
            let set = load_set(fixtures.as_ref())?;
            let results = run_set(&set, filter.as_deref())?;
            let report = build_report(&set.area, &results);
            let rendered = match format.as_str() {
                "plain" => render_plain(&report),
                "markdown" => render_markdown(&report),
                "json" => serde_json::to_string_pretty(&report)?,
                other => return Err(format!("unknown format `{other}`").into()),
            };
            match output {
                Some(path) => std::fs::write(path, rendered)?,
                None => print!("{rendered}"),
            }
            Ok(report.all_passed())
        }
        Command::List { fixtures } => {
            let set = load_set(fixtures.as_ref())?;
            println!("{} ({} cases)", set.area, set.cases.len());
            for case in &set.cases {
                println!("  {} [{}]", case.name, case.operation);
            }
            Ok(true)
        }
        Command::Export { output } => {
            let set = builtin_set();
            std::fs::write(output, set.to_json()?)?;
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
