//! depbump - Multi-ecosystem dependency requirement updater CLI tool
//!
//! Reads a request file describing dependencies, their declared
//! requirements and the versions to move to, prints the rewritten
//! requirements and optionally patches the manifests in place.

use clap::Parser;
use depbump::cli::CliArgs;
use depbump::orchestrator::Orchestrator;
use depbump::output::{create_formatter, OutputConfig};
use log::LevelFilter;
use std::io::{self, Write};
use std::process::ExitCode;

fn initialize_logger(level: LevelFilter) -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("depbump")
        .build();

    // stderr only, stdout carries the formatted results
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = initialize_logger(args.log_level()) {
        eprintln!("Warning: could not initialise logging: {}", e);
    }

    // Run the main logic and handle errors
    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    log::info!("depbump v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Request: {}", args.request.display());
    if args.should_write_files() {
        log::info!("Mode: write");
    } else if args.dry_run {
        log::info!("Mode: dry-run");
    }

    let output_config = OutputConfig::from_cli(&args);

    // Create and run the orchestrator
    let orchestrator = Orchestrator::new(args);
    let result = orchestrator.run()?;

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    for error in &result.errors {
        log::warn!("{}", error);
    }

    if result.has_failures() {
        // Partial success - some dependencies or edits failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
