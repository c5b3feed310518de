//! Doxygen comment generator - Command-line tool for documenting C++ sources.
//!
//! This binary inserts structured Doxygen comments above the classes,
//! functions, enums, variables and unit-test cases it recognizes in C++
//! headers and sources. Existing comments are kept unless
//! `--enhance-existing` is given.
//!
//! # Usage
//!
//! ```bash
//! doxygen-from-source [OPTIONS] (--input-file FILE | --directory DIR | --project DIR)
//! ```
//!
//! # Examples
//!
//! Preview the comments for one header:
//! ```bash
//! doxygen-from-source -f include/widget.hpp --dry-run --diff
//! ```
//!
//! Document a whole project in place and keep a JSON report:
//! ```bash
//! doxygen-from-source -p . --report docs-report.json --report-format json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! doxygen-from-source -d tests -v
//! ```

mod cli;
mod scanner;
mod parser;
mod signature;
mod detector;
mod extractor;
mod synthesizer;
mod rewriter;
mod generator;
mod serializer;
mod error;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Doxygen comment generator starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
