//! File output and run report serialization.
//!
//! Rewritten sources are written back with [`write_to_file`]; the run report
//! can be rendered as YAML or pretty JSON.

use crate::error;
use crate::generator::{RunReport, SourceKind};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a run report to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(report: &RunReport) -> Result<String> {
    debug!("Serializing run report to YAML");
    serde_yaml::to_string(report).context("Failed to serialize run report to YAML")
}

/// Serializes a run report to JSON with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(report: &RunReport) -> Result<String> {
    debug!("Serializing run report to JSON");
    serde_json::to_string_pretty(report).context("Failed to serialize run report to JSON")
}

/// Reads a C++ file and determines whether it is a header or a source.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so legacy
/// Latin-1 comments do not stop a run.
///
/// # Errors
///
/// Returns `Error::UnsupportedFileType` for non-C++ extensions and
/// `Error::IoError` if the file cannot be read.
pub fn read_source(path: &Path) -> error::Result<(String, SourceKind)> {
    let kind = SourceKind::from_path(path)?;
    let bytes = fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    Ok((text, kind))
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an
/// existing file.
///
/// # Arguments
///
/// * `content` - The string content to write
/// * `path` - The file path to write to
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::generator::{DocGenerator, GenerateOptions};
    use crate::rewriter::RewriteMode;
    use tempfile::TempDir;

    fn create_test_report() -> RunReport {
        let options = GenerateOptions { source_kind: SourceKind::Source, ..Default::default() };
        let text = "#include <gtest/gtest.h>\n\nTEST(MathTest, TestAddition) {\n    EXPECT_EQ(2 + 2, 4);\n}\n";
        let generated = DocGenerator::generate(text, &options);
        RunReport::new(
            RewriteMode::SkipExisting,
            false,
            vec![generated.report(Path::new("math_test.cpp"), SourceKind::Source)],
        )
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_report()).unwrap();

        assert!(yaml.contains("mode: skip-existing"));
        assert!(yaml.contains("path: math_test.cpp"));
        assert!(yaml.contains("source_kind: source"));
        assert!(yaml.contains("framework: gtest"));
        assert!(yaml.contains("display_name: Tests Addition"));
        assert!(yaml.contains("- equality"));
        assert!(!yaml.contains("indeterminate"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_report()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["mode"], "skip-existing");
        assert_eq!(parsed["totals"]["files"], 1);
        assert_eq!(parsed["totals"]["inserted"], 1);
        assert_eq!(parsed["totals"]["tests"], 1);
        assert_eq!(parsed["files"][0]["tests"][0]["suite"], "MathTest");
        assert_eq!(parsed["files"][0]["tests"][0]["test_kind"], "TEST");
        assert!(json.lines().count() > 5, "Pretty printed JSON should have multiple lines");
    }

    #[test]
    fn test_read_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("widget.hpp");
        fs::write(&path, b"// caf\xe9\nint x;\n").unwrap();

        let (text, kind) = read_source(&path).unwrap();
        assert_eq!(kind, SourceKind::Header);
        assert!(text.ends_with("\nint x;\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_source_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = read_source(&temp_dir.path().join("missing.cpp")).unwrap_err();
        assert!(matches!(missing, Error::IoError(_)));

        let text_file = temp_dir.path().join("notes.txt");
        fs::write(&text_file, "hello").unwrap();
        let unsupported = read_source(&text_file).unwrap_err();
        assert!(matches!(unsupported, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("widget.hpp");

        write_to_file("int x;\n", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "int x;\n");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("widget.hpp");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
