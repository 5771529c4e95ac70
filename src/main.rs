//! docxlinks command-line entry point.

mod commands;
mod diagnostics;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docxlinks::report::ReportFormat;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command-line interface.
#[derive(Parser)]
#[command(name = "docxlinks", about = "Find, classify and audit the links in .docx documents")]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Log the extraction audit trail (same as RUST_LOG=docxlinks=debug).
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Extract every link and write one report per document
    Extract {
        /// Output format of the reports.
        #[arg(long, value_enum, default_value_t = ReportFormat::Xlsx)]
        format: ReportFormat,
        /// Directory for the reports (default: next to each document).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// A .docx file, or a directory to scan recursively.
        path: PathBuf,
    },
    /// Print link counts per type for one document
    Summary {
        /// Print JSON instead of markdown.
        #[arg(long)]
        json: bool,
        /// The .docx file.
        path: PathBuf,
    },
}

/// Run one subcommand and map its result to an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract { format, output_dir, path } => commands::extract(&path, output_dir.as_deref(), format),
        Commands::Summary { json, path } => commands::summary(&path, json),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
        Ok(code) => code,
    };
}

/// Install the stderr subscriber. Warnings show by default, `--verbose`
/// enables the full audit trail, and `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
    return;
}
