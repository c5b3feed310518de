use crate::generator::{HEADER_EXTENSIONS, SOURCE_EXTENSIONS};
use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names that are never descended into.
const SKIPPED_DIRS: &[&str] = &["build", "__pycache__", "venv", "node_modules"];

/// File scanner for collecting C++ headers and sources.
///
/// The `FileScanner` walks a directory and keeps every file with a C++ header
/// or source extension. Hidden directories (`.git`, `.svn`, `.venv`, ...),
/// build output (`build`, `cmake-build-*`) and Python caches are skipped.
///
/// # Example
///
/// ```no_run
/// use doxygen_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} C++ files", result.files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    recursive: bool,
}

/// Result of directory scanning operation.
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered C++ files, sorted by path
    pub files: Vec<PathBuf>,
    /// Warning messages for entries that could not be read
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a recursive scanner rooted at `root_path`.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path, recursive: true }
    }

    /// Limits the scan to the root directory itself when `recursive` is false.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Scans the directory tree and collects C++ files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning
    /// continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root_path.display());
        }

        let mut files = Vec::new();
        let mut warnings = Vec::new();
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        for entry in WalkDir::new(&self.root_path)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() == self.root_path || !is_skipped_dir(e))
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_file() && is_cpp_file(path) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!("Found {} C++ files under {}", files.len(), self.root_path.display());
        Ok(ScanResult { files, warnings })
    }

    /// Scans a project laid out as `include/` and `src/`.
    ///
    /// Either directory may be missing, but not both.
    ///
    /// # Errors
    ///
    /// Returns an error if the project has neither an `include` nor a `src`
    /// directory.
    pub fn scan_project(root: &Path, recursive: bool) -> Result<ScanResult> {
        let dirs: Vec<PathBuf> = ["include", "src"]
            .iter()
            .map(|name| root.join(name))
            .filter(|dir| dir.is_dir())
            .collect();
        if dirs.is_empty() {
            anyhow::bail!(
                "Project has no include/ or src/ directory: {}",
                root.display()
            );
        }

        let mut result = ScanResult { files: Vec::new(), warnings: Vec::new() };
        for dir in dirs {
            let part = FileScanner::new(dir).recursive(recursive).scan()?;
            result.files.extend(part.files);
            result.warnings.extend(part.warnings);
        }
        Ok(result)
    }
}

/// Returns true for paths ending in a C++ header or source extension.
pub fn is_cpp_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| {
            HEADER_EXTENSIONS.contains(&ext.as_str()) || SOURCE_EXTENSIONS.contains(&ext.as_str())
        })
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with("cmake-build-") || SKIPPED_DIRS.contains(&&*name)
}
