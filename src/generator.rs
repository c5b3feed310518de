//! Documentation generation for one in-memory source text.
//!
//! This is the seam between the pure core (scanner, detector, analyzer,
//! synthesizer, rewriter) and the file-handling CLI: it takes text and options
//! and returns the rewritten text plus everything needed for a run report.

use crate::cli::TestFramework;
use crate::detector::FrameworkDetector;
use crate::error::{Error, Result};
use crate::extractor::{analyze, TestCase};
use crate::parser::{DeclarationScanner, SourceUnit};
use crate::rewriter::{RewriteEngine, RewriteMode, RewriteResult};
use crate::synthesizer::{synthesize, CommentBlock};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

pub const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx"];
pub const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c++"];

/// Whether a file is a header or an implementation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Header,
    Source,
}

impl SourceKind {
    /// Derives the kind from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFileType` for anything but a C++ header or
    /// source extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if HEADER_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::Header)
        } else if SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::Source)
        } else {
            Err(Error::UnsupportedFileType(path.to_path_buf()))
        }
    }
}

/// Options for a single generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    pub mode: RewriteMode,
    pub source_kind: SourceKind,
    /// Analyze tests even in headers, and pick a dialect for mixed files
    pub test_mode: bool,
    /// Dialect to use instead of detection
    pub framework: Option<TestFramework>,
}

/// Result of generating documentation for one text.
#[derive(Debug, Clone)]
pub struct Generated {
    pub result: RewriteResult,
    pub units: Vec<SourceUnit>,
    pub framework: Option<TestFramework>,
    /// The file showed test evidence for several dialects
    pub indeterminate: bool,
    pub tests: Vec<TestCase>,
}

impl Generated {
    pub fn text(&self) -> &str {
        &self.result.text
    }

    /// Summarizes this generation for the run report.
    pub fn report(&self, path: &Path, source_kind: SourceKind) -> FileReport {
        FileReport {
            path: path.display().to_string(),
            source_kind,
            framework: self.framework,
            indeterminate: self.indeterminate,
            units: self.units.iter().filter(|u| u.kind.is_documentable()).count(),
            inserted: self.result.inserted,
            replaced: self.result.replaced,
            skipped: self.result.skipped,
            tests: self.tests.clone(),
        }
    }
}

/// Per-file entry of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub source_kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<TestFramework>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub indeterminate: bool,
    /// Documentable units found
    pub units: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestCase>,
}

/// Machine-readable summary of one CLI run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: RewriteMode,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub totals: Totals,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub changed_files: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub tests: usize,
}

impl RunReport {
    pub fn new(mode: RewriteMode, dry_run: bool, files: Vec<FileReport>) -> Self {
        let totals = files.iter().fold(Totals::default(), |mut acc, f| {
            acc.files += 1;
            if f.inserted + f.replaced > 0 {
                acc.changed_files += 1;
            }
            acc.inserted += f.inserted;
            acc.replaced += f.replaced;
            acc.skipped += f.skipped;
            acc.tests += f.tests.len();
            acc
        });
        Self { mode, dry_run, files, totals }
    }
}

/// Runs the documentation pipeline over in-memory text.
///
/// # Example
///
/// ```
/// use doxygen_from_source::generator::{DocGenerator, GenerateOptions};
///
/// let generated = DocGenerator::generate("int add(int a, int b);\n", &GenerateOptions::default());
/// assert!(generated.text().contains("@param a"));
/// ```
pub struct DocGenerator;

impl DocGenerator {
    /// Documents every recognized unit of `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - Full contents of one C++ file
    /// * `options` - Rewrite mode, source kind and test analysis settings
    ///
    /// # Returns
    ///
    /// Returns the rewritten text together with the scanned units and the
    /// extracted test cases. Recognition misses only mean fewer comments.
    pub fn generate(text: &str, options: &GenerateOptions) -> Generated {
        let units = DeclarationScanner::scan(text);
        let (framework, indeterminate) = Self::resolve_framework(text, options);

        let tests = framework.map(|fw| analyze(text, fw)).unwrap_or_default();
        let bound = Self::bind_tests(&units, &tests);

        let comments: Vec<(usize, CommentBlock)> = units
            .iter()
            .enumerate()
            .filter(|(_, unit)| unit.kind.is_documentable())
            .map(|(idx, unit)| (idx, synthesize(unit, bound.get(&idx).copied())))
            .collect();

        let result = RewriteEngine::new(options.mode).rewrite(text, &units, &comments);

        Generated { result, units, framework, indeterminate, tests }
    }

    fn resolve_framework(text: &str, options: &GenerateOptions) -> (Option<TestFramework>, bool) {
        if let Some(framework) = options.framework {
            debug!("Using requested framework: {}", framework.display_name());
            return (Some(framework), false);
        }
        if options.source_kind == SourceKind::Header && !options.test_mode {
            return (None, false);
        }

        let detection = FrameworkDetector::detect(text);
        if let Some(framework) = detection.framework() {
            return (Some(framework), false);
        }
        if !detection.is_indeterminate() {
            return (None, false);
        }

        let mentioned = detection.mentioned();
        if options.test_mode {
            if let Some(&first) = mentioned.first() {
                warn!(
                    "Mixed test dialects {:?}; analyzing as {} because test mode is on",
                    mentioned,
                    first.display_name()
                );
                return (Some(first), true);
            }
        }
        warn!(
            "Mixed test dialects {:?}; test cases get generic documentation",
            mentioned
        );
        (None, true)
    }

    /// Maps unit indices to the test whose head starts on the unit's first line.
    fn bind_tests<'a>(units: &[SourceUnit], tests: &'a [TestCase]) -> HashMap<usize, &'a TestCase> {
        let by_line: HashMap<usize, usize> = units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.kind.is_documentable())
            .map(|(idx, u)| (u.start_line, idx))
            .collect();

        let mut bound = HashMap::new();
        for test in tests {
            match by_line.get(&test.start_line) {
                Some(&idx) => {
                    bound.insert(idx, test);
                }
                None => debug!(
                    "Test '{}' at line {} has no matching declaration",
                    test.name,
                    test.start_line + 1
                ),
            }
        }
        bound
    }
}
