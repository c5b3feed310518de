use crate::generator::{DocGenerator, FileReport, GenerateOptions, RunReport, SourceKind};
use crate::rewriter::RewriteMode;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Doxygen comment generator - Add structured documentation comments to C++ sources
#[derive(Parser, Debug)]
#[command(name = "doxygen-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Single C++ header or source file to document
    #[arg(short = 'f', long = "input-file", value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Directory whose C++ files are documented
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Project root containing include/ and src/ directories
    #[arg(short = 'p', long = "project", value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Output file (single file) or directory (directory/project); defaults to in place
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Print results instead of writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print a unified diff of the edits
    #[arg(long = "diff")]
    pub diff: bool,

    /// Analyze test cases in every file, even headers and mixed-dialect files
    #[arg(long = "test-mode")]
    pub test_mode: bool,

    /// Replace existing Doxygen comments instead of skipping them
    #[arg(long = "enhance-existing")]
    pub enhance_existing: bool,

    /// Test framework to assume (if not specified, auto-detect per file)
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Option<TestFramework>,

    /// Only process the top level of the directory
    #[arg(long = "no-recursive")]
    pub no_recursive: bool,

    /// Write a run report to this file
    #[arg(long = "report", value_name = "FILE")]
    pub report_path: Option<PathBuf>,

    /// Run report format (yaml or json)
    #[arg(long = "report-format", value_enum, default_value = "yaml")]
    pub report_format: ReportFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Run report format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Supported unit-test frameworks
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TestFramework {
    /// Google Test
    #[value(name = "gtest")]
    #[serde(rename = "gtest")]
    GoogleTest,
    /// Catch2
    #[value(name = "catch2")]
    #[serde(rename = "catch2")]
    Catch2,
    /// doctest
    #[value(name = "doctest")]
    #[serde(rename = "doctest")]
    Doctest,
    /// Boost.Test
    #[value(name = "boost")]
    #[serde(rename = "boost")]
    BoostTest,
    /// CppUnit
    #[value(name = "cppunit")]
    #[serde(rename = "cppunit")]
    CppUnit,
}

impl TestFramework {
    /// Name used in generated comments
    pub fn display_name(self) -> &'static str {
        match self {
            TestFramework::GoogleTest => "Google Test",
            TestFramework::Catch2 => "Catch2",
            TestFramework::Doctest => "doctest",
            TestFramework::BoostTest => "Boost.Test",
            TestFramework::CppUnit => "CppUnit",
        }
    }
}

/// Where the files to process come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Directory(PathBuf),
    Project(PathBuf),
}

impl CliArgs {
    /// The single input source selected on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error unless exactly one of `--input-file`, `--directory`
    /// and `--project` was given.
    pub fn input_source(&self) -> Result<InputSource> {
        let mut sources = Vec::new();
        if let Some(path) = &self.input_file {
            sources.push(InputSource::File(path.clone()));
        }
        if let Some(path) = &self.directory {
            sources.push(InputSource::Directory(path.clone()));
        }
        if let Some(path) = &self.project {
            sources.push(InputSource::Project(path.clone()));
        }
        match sources.len() {
            1 => Ok(sources.remove(0)),
            0 => anyhow::bail!("No input given. Use one of --input-file, --directory or --project"),
            _ => anyhow::bail!("Only one of --input-file, --directory or --project may be given"),
        }
    }

    pub fn mode(&self) -> RewriteMode {
        if self.enhance_existing {
            RewriteMode::EnhanceExisting
        } else {
            RewriteMode::SkipExisting
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    match args.input_source()? {
        InputSource::File(path) => {
            if !path.is_file() {
                anyhow::bail!("Input file does not exist: {}", path.display());
            }
            SourceKind::from_path(&path)?;
            info!("Input file: {}", path.display());
        }
        InputSource::Directory(path) => {
            if !path.is_dir() {
                anyhow::bail!("Directory does not exist: {}", path.display());
            }
            info!("Input directory: {}", path.display());
        }
        InputSource::Project(path) => {
            if !path.is_dir() {
                anyhow::bail!("Project path is not a directory: {}", path.display());
            }
            info!("Project: {}", path.display());
        }
    }

    info!("Mode: {}", args.mode());
    if args.dry_run {
        info!("Output: stdout (dry run)");
    } else if let Some(ref output) = args.output_path {
        info!("Output: {}", output.display());
    } else {
        info!("Output: in place");
    }
    if let Some(framework) = args.framework {
        info!("Framework: {}", framework.display_name());
    } else {
        info!("Framework: auto-detect");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::scanner::FileScanner;
    use crate::serializer::{read_source, serialize_json, serialize_yaml, write_to_file};

    info!("Starting Doxygen comment generation...");
    let source = args.input_source()?;
    let recursive = !args.no_recursive;

    // Step 1: Collect input files
    let (root, files) = match &source {
        InputSource::File(path) => (None, vec![path.clone()]),
        InputSource::Directory(dir) => {
            info!("Scanning directory...");
            let scan = FileScanner::new(dir.clone()).recursive(recursive).scan()?;
            for warning in &scan.warnings {
                log::warn!("{}", warning);
            }
            (Some(dir.clone()), scan.files)
        }
        InputSource::Project(dir) => {
            info!("Scanning project include/ and src/...");
            let scan = FileScanner::scan_project(dir, recursive)?;
            for warning in &scan.warnings {
                log::warn!("{}", warning);
            }
            (Some(dir.clone()), scan.files)
        }
    };

    info!("Found {} C++ files", files.len());
    if files.is_empty() {
        log::warn!("No C++ files to process");
    }

    // Step 2: Generate documentation file by file
    let mode = args.mode();
    let mut reports: Vec<FileReport> = Vec::new();

    for path in &files {
        let (text, source_kind) = match read_source(path) {
            Ok(read) => read,
            Err(e) if root.is_some() => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        debug!("Processing {} ({:?})", path.display(), source_kind);
        let options = GenerateOptions {
            mode,
            source_kind,
            test_mode: args.test_mode,
            framework: args.framework,
        };
        let generated = DocGenerator::generate(&text, &options);

        // Step 3: Emit results
        if args.diff {
            print!("{}", generated.result.diff(&path.display().to_string()));
        }
        if args.dry_run {
            if !args.diff {
                print!("{}", generated.text());
            }
        } else {
            let target = output_target(path, root.as_deref(), args.output_path.as_deref());
            if generated.result.is_changed() || target != *path {
                write_to_file(generated.text(), &target)?;
                info!(
                    "Documented {} ({} inserted, {} replaced)",
                    target.display(),
                    generated.result.inserted,
                    generated.result.replaced
                );
            } else {
                debug!("No changes for {}", path.display());
            }
        }

        reports.push(generated.report(path, source_kind));
    }

    let report = RunReport::new(mode, args.dry_run, reports);

    // Step 4: Write the run report
    if let Some(report_path) = &args.report_path {
        info!("Serializing run report to {:?} format...", args.report_format);
        let content = match args.report_format {
            ReportFormat::Yaml => serialize_yaml(&report)?,
            ReportFormat::Json => serialize_json(&report)?,
        };
        write_to_file(&content, report_path)?;
        info!("Wrote run report to {}", report_path.display());
    }

    // Step 5: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files processed: {}", report.totals.files);
    info!("  - Files changed: {}", report.totals.changed_files);
    info!("  - Comments inserted: {}", report.totals.inserted);
    info!("  - Comments replaced: {}", report.totals.replaced);
    info!("  - Existing comments kept: {}", report.totals.skipped);
    info!("  - Test cases documented: {}", report.totals.tests);

    Ok(())
}

/// Where the rewritten `path` goes: the output file for a single input, the
/// same relative location under the output directory for a tree, or in place.
fn output_target(path: &Path, root: Option<&Path>, output: Option<&Path>) -> PathBuf {
    match (root, output) {
        (_, None) => path.to_path_buf(),
        (None, Some(output)) => output.to_path_buf(),
        (Some(root), Some(output)) => match path.strip_prefix(root) {
            Ok(relative) => output.join(relative),
            Err(_) => output.join(path.file_name().unwrap_or(path.as_os_str())),
        },
    }
}
