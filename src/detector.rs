use crate::cli::TestFramework;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*#\s*include\s*[<"]([^>"]+)[>"]"#).unwrap());

static RE_MACRO_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Z0-9_]*)\s*\(").unwrap());

/// One row of the dialect signature table.
struct Signature {
    framework: TestFramework,
    includes: &'static [&'static str],
    macros: &'static [&'static str],
}

/// Dialects in priority order. The first candidate wins when several remain.
const SIGNATURES: &[Signature] = &[
    Signature {
        framework: TestFramework::GoogleTest,
        includes: &["gtest", "gmock"],
        macros: &["TEST", "TEST_F", "TEST_P", "TYPED_TEST", "TYPED_TEST_P", "INSTANTIATE_TEST_SUITE_P"],
    },
    Signature {
        framework: TestFramework::Catch2,
        includes: &["catch2", "catch.hpp"],
        macros: &["TEMPLATE_TEST_CASE", "TEST_CASE_METHOD", "SECTION"],
    },
    Signature {
        framework: TestFramework::Doctest,
        includes: &["doctest"],
        macros: &["TEST_SUITE", "TEST_SUITE_BEGIN", "TEST_CASE_FIXTURE", "SUBCASE"],
    },
    Signature {
        framework: TestFramework::BoostTest,
        includes: &["boost/test"],
        macros: &[
            "BOOST_AUTO_TEST_CASE",
            "BOOST_FIXTURE_TEST_CASE",
            "BOOST_AUTO_TEST_SUITE",
            "BOOST_FIXTURE_TEST_SUITE",
            "BOOST_DATA_TEST_CASE",
        ],
    },
    Signature {
        framework: TestFramework::CppUnit,
        includes: &["cppunit"],
        macros: &["CPPUNIT_TEST_SUITE", "CPPUNIT_TEST"],
    },
];

/// Spellings two dialects share. They count as test evidence but never
/// decide between Catch2 and doctest on their own.
const SHARED_MACROS: &[&str] = &["TEST_CASE", "SCENARIO"];

/// Identifies the unit-test dialect a C++ file is written in.
///
/// Detection looks at `#include` paths and at the macro spellings used in the
/// file. Every piece of evidence names the dialects it is compatible with; a
/// dialect is a candidate when it is compatible with all of it.
///
/// # Example
///
/// ```
/// use doxygen_from_source::cli::TestFramework;
/// use doxygen_from_source::detector::FrameworkDetector;
///
/// let text = "#include <gtest/gtest.h>\nTEST(MathTest, Adds) {}\n";
/// let result = FrameworkDetector::detect(text);
/// assert_eq!(result.framework(), Some(TestFramework::GoogleTest));
/// ```
pub struct FrameworkDetector;

/// A single observation that points at one or more dialects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// The include path or macro name that was observed
    pub token: String,
    pub line: usize,
    pub frameworks: Vec<TestFramework>,
}

/// Result of dialect detection for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// Dialects compatible with all evidence, in priority order
    pub candidates: Vec<TestFramework>,
    pub evidence: Vec<Evidence>,
}

impl DetectionResult {
    /// The detected dialect, or `None` for plain code and for mixed files.
    pub fn framework(&self) -> Option<TestFramework> {
        self.candidates.first().copied()
    }

    /// True when the file shows test evidence but no single dialect explains it.
    pub fn is_indeterminate(&self) -> bool {
        self.candidates.is_empty() && !self.evidence.is_empty()
    }

    /// Dialects mentioned by any piece of evidence, in priority order.
    pub fn mentioned(&self) -> Vec<TestFramework> {
        SIGNATURES
            .iter()
            .map(|sig| sig.framework)
            .filter(|fw| self.evidence.iter().any(|e| e.frameworks.contains(fw)))
            .collect()
    }
}

impl FrameworkDetector {
    /// Detects the test dialect of `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - Full contents of a C++ file
    ///
    /// # Returns
    ///
    /// Returns a `DetectionResult` whose `framework()` is the single dialect
    /// compatible with every observation, or `None` when there is no test
    /// evidence or when the evidence is mixed.
    pub fn detect(text: &str) -> DetectionResult {
        let evidence = Self::collect_evidence(text);

        let candidates: Vec<TestFramework> = SIGNATURES
            .iter()
            .map(|sig| sig.framework)
            .filter(|fw| !evidence.is_empty() && evidence.iter().all(|e| e.frameworks.contains(fw)))
            .collect();

        debug!(
            "Detection: {} observations, candidates {:?}",
            evidence.len(),
            candidates
        );

        DetectionResult { candidates, evidence }
    }

    fn collect_evidence(text: &str) -> Vec<Evidence> {
        let mut evidence: Vec<Evidence> = Vec::new();
        let mut in_block_comment = false;

        for (line_no, line) in text.lines().enumerate() {
            let trimmed = line.trim_start();

            if in_block_comment {
                if trimmed.contains("*/") {
                    in_block_comment = false;
                }
                continue;
            }
            if trimmed.starts_with("//") || trimmed.starts_with('*') {
                continue;
            }
            if trimmed.starts_with("/*") {
                in_block_comment = !trimmed.contains("*/");
                continue;
            }

            if let Some(caps) = RE_INCLUDE.captures(line) {
                let path = caps[1].to_lowercase();
                let frameworks: Vec<TestFramework> = SIGNATURES
                    .iter()
                    .filter(|sig| sig.includes.iter().any(|inc| path.contains(inc)))
                    .map(|sig| sig.framework)
                    .collect();
                if !frameworks.is_empty() {
                    evidence.push(Evidence { token: caps[1].to_string(), line: line_no, frameworks });
                }
                continue;
            }
            if trimmed.starts_with('#') {
                continue;
            }

            let code = line.split("//").next().unwrap_or(line);
            for caps in RE_MACRO_CALL.captures_iter(code) {
                let token = &caps[1];
                let frameworks = Self::frameworks_for_macro(token);
                if frameworks.is_empty() {
                    continue;
                }
                if evidence.iter().any(|e| e.token == token) {
                    continue;
                }
                evidence.push(Evidence { token: token.to_string(), line: line_no, frameworks });
            }
        }
        evidence
    }

    fn frameworks_for_macro(token: &str) -> Vec<TestFramework> {
        if SHARED_MACROS.contains(&token) {
            return vec![TestFramework::Catch2, TestFramework::Doctest];
        }
        SIGNATURES
            .iter()
            .filter(|sig| sig.macros.contains(&token))
            .map(|sig| sig.framework)
            .collect()
    }
}
