//! Test case extraction for the supported unit-test dialects.
//!
//! This module provides a unified interface for extracting test cases from C++ test
//! files. Each dialect has its own extractor that knows its macro spellings; all of
//! them share the assertion table and the argument/body helpers defined here.
//!
//! # Supported Frameworks
//!
//! - **GoogleTest**: See [`gtest::GoogleTestExtractor`]
//! - **Catch2** and **doctest**: See [`catch::CatchExtractor`]
//! - **Boost.Test**: See [`boost::BoostTestExtractor`]
//! - **CppUnit**: See [`cppunit::CppUnitExtractor`]
//!
//! # Example
//!
//! ```
//! use doxygen_from_source::cli::TestFramework;
//! use doxygen_from_source::extractor::{analyze, AssertionKind};
//!
//! let text = "TEST(MathTest, TestAddition) {\n    EXPECT_EQ(2 + 2, 4);\n}\n";
//! let tests = analyze(text, TestFramework::GoogleTest);
//! assert_eq!(tests[0].display_name, "Tests Addition");
//! assert!(tests[0].assertion_kinds.contains(&AssertionKind::Equality));
//! ```

pub mod boost;
pub mod catch;
pub mod cppunit;
pub mod gtest;

use crate::cli::TestFramework;
use crate::parser::{find_block, BraceCounter, LineRange};
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static RE_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Z0-9_]*)\s*\(").unwrap());

/// Trait for extracting test cases from the lines of one C++ file.
///
/// Implementations only read the text. The returned test cases are bound to
/// declaration units afterwards through their `start_line`.
pub trait TestCaseExtractor {
    /// Extracts all test cases found in `lines`.
    ///
    /// # Arguments
    ///
    /// * `lines` - The file's lines, without line terminators
    ///
    /// # Returns
    ///
    /// Returns one `TestCase` per recognized test, in no particular order.
    fn extract_tests(&self, lines: &[&str]) -> Vec<TestCase>;
}

/// Semantic metadata for a single test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Human-readable description used for the `@brief` line
    pub display_name: String,
    /// Identifier or string literal naming the test in the source
    pub name: String,
    pub suite: Option<String>,
    /// Fixture class; equals the suite for fixture-based macros
    pub fixture: Option<String>,
    pub framework: TestFramework,
    /// Literal macro form, e.g. `TEST_F` or `CPPUNIT_TEST`
    pub test_kind: String,
    pub assertion_kinds: BTreeSet<AssertionKind>,
    /// Catch2 tag string such as `[string][fast]`
    pub tags: Option<String>,
    /// Names of nested `SECTION`/`SUBCASE` blocks
    pub sections: Vec<String>,
    pub body_range: Option<LineRange>,
    /// Line of the macro or method head that the test is bound by
    pub start_line: usize,
}

/// Normalized category of an assertion macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssertionKind {
    Equality,
    Inequality,
    Ordering,
    ApproximateEquality,
    BooleanTrue,
    BooleanFalse,
    ThrowExpected,
    NoThrowExpected,
    Matcher,
}

impl AssertionKind {
    /// Maps an assertion macro spelling of any supported dialect to its kind.
    pub fn from_macro(token: &str) -> Option<Self> {
        let kind = match token {
            "EXPECT_EQ" | "ASSERT_EQ" | "EXPECT_STREQ" | "ASSERT_STREQ" | "EXPECT_STRCASEEQ"
            | "ASSERT_STRCASEEQ" | "CHECK_EQ" | "REQUIRE_EQ" | "WARN_EQ" | "BOOST_CHECK_EQUAL"
            | "BOOST_REQUIRE_EQUAL" | "BOOST_WARN_EQUAL" | "BOOST_CHECK_EQUAL_COLLECTIONS"
            | "BOOST_REQUIRE_EQUAL_COLLECTIONS" | "CPPUNIT_ASSERT_EQUAL"
            | "CPPUNIT_ASSERT_EQUAL_MESSAGE" => AssertionKind::Equality,

            "EXPECT_NE" | "ASSERT_NE" | "EXPECT_STRNE" | "ASSERT_STRNE" | "EXPECT_STRCASENE"
            | "ASSERT_STRCASENE" | "CHECK_NE" | "REQUIRE_NE" | "WARN_NE" | "BOOST_CHECK_NE"
            | "BOOST_REQUIRE_NE" | "BOOST_WARN_NE" => AssertionKind::Inequality,

            "EXPECT_LT" | "EXPECT_LE" | "EXPECT_GT" | "EXPECT_GE" | "ASSERT_LT" | "ASSERT_LE"
            | "ASSERT_GT" | "ASSERT_GE" | "CHECK_LT" | "CHECK_LE" | "CHECK_GT" | "CHECK_GE"
            | "REQUIRE_LT" | "REQUIRE_LE" | "REQUIRE_GT" | "REQUIRE_GE" | "BOOST_CHECK_LT"
            | "BOOST_CHECK_LE" | "BOOST_CHECK_GT" | "BOOST_CHECK_GE" | "BOOST_REQUIRE_LT"
            | "BOOST_REQUIRE_LE" | "BOOST_REQUIRE_GT" | "BOOST_REQUIRE_GE"
            | "CPPUNIT_ASSERT_LESS" | "CPPUNIT_ASSERT_GREATER" | "CPPUNIT_ASSERT_LESSEQUAL"
            | "CPPUNIT_ASSERT_GREATEREQUAL" => AssertionKind::Ordering,

            "EXPECT_NEAR" | "ASSERT_NEAR" | "EXPECT_FLOAT_EQ" | "ASSERT_FLOAT_EQ"
            | "EXPECT_DOUBLE_EQ" | "ASSERT_DOUBLE_EQ" | "BOOST_CHECK_CLOSE"
            | "BOOST_REQUIRE_CLOSE" | "BOOST_CHECK_CLOSE_FRACTION"
            | "BOOST_REQUIRE_CLOSE_FRACTION" | "BOOST_CHECK_SMALL" | "BOOST_REQUIRE_SMALL"
            | "CPPUNIT_ASSERT_DOUBLES_EQUAL" => AssertionKind::ApproximateEquality,

            "EXPECT_TRUE" | "ASSERT_TRUE" | "REQUIRE" | "CHECK" | "WARN" | "CHECKED_IF"
            | "REQUIRE_UNARY" | "CHECK_UNARY" | "BOOST_CHECK" | "BOOST_REQUIRE" | "BOOST_WARN"
            | "BOOST_TEST" | "BOOST_TEST_REQUIRE" | "BOOST_TEST_CHECK" | "CPPUNIT_ASSERT"
            | "CPPUNIT_ASSERT_MESSAGE" => AssertionKind::BooleanTrue,

            "EXPECT_FALSE" | "ASSERT_FALSE" | "REQUIRE_FALSE" | "CHECK_FALSE" | "WARN_FALSE"
            | "CHECKED_ELSE" | "REQUIRE_UNARY_FALSE" | "CHECK_UNARY_FALSE" => {
                AssertionKind::BooleanFalse
            }

            "EXPECT_THROW" | "ASSERT_THROW" | "EXPECT_ANY_THROW" | "ASSERT_ANY_THROW"
            | "REQUIRE_THROWS" | "CHECK_THROWS" | "REQUIRE_THROWS_AS" | "CHECK_THROWS_AS"
            | "REQUIRE_THROWS_WITH" | "CHECK_THROWS_WITH" | "REQUIRE_THROWS_MATCHES"
            | "CHECK_THROWS_MATCHES" | "WARN_THROWS" | "WARN_THROWS_AS" | "BOOST_CHECK_THROW"
            | "BOOST_REQUIRE_THROW" | "BOOST_WARN_THROW" | "BOOST_CHECK_EXCEPTION"
            | "BOOST_REQUIRE_EXCEPTION" | "CPPUNIT_ASSERT_THROW"
            | "CPPUNIT_ASSERT_THROW_MESSAGE" => AssertionKind::ThrowExpected,

            "EXPECT_NO_THROW" | "ASSERT_NO_THROW" | "REQUIRE_NOTHROW" | "CHECK_NOTHROW"
            | "WARN_NOTHROW" | "BOOST_CHECK_NO_THROW" | "BOOST_REQUIRE_NO_THROW"
            | "BOOST_WARN_NO_THROW" | "CPPUNIT_ASSERT_NO_THROW"
            | "CPPUNIT_ASSERT_NO_THROW_MESSAGE" => AssertionKind::NoThrowExpected,

            "EXPECT_THAT" | "ASSERT_THAT" | "REQUIRE_THAT" | "CHECK_THAT" => AssertionKind::Matcher,

            _ => return None,
        };
        Some(kind)
    }

    /// Bullet text for the `Test Coverage:` section.
    pub fn coverage_phrase(self) -> &'static str {
        match self {
            AssertionKind::Equality => "Covers equality comparison",
            AssertionKind::Inequality => "Covers inequality comparison",
            AssertionKind::Ordering => "Covers ordering comparison",
            AssertionKind::ApproximateEquality => "Covers approximate floating-point comparison",
            AssertionKind::BooleanTrue => "Covers boolean true condition",
            AssertionKind::BooleanFalse => "Covers boolean false condition",
            AssertionKind::ThrowExpected => "Covers exception throwing behavior",
            AssertionKind::NoThrowExpected => "Covers no exception behavior",
            AssertionKind::Matcher => "Covers matcher-based expectations",
        }
    }
}

/// Returns the extractor for a dialect.
pub fn extractor_for(framework: TestFramework) -> Box<dyn TestCaseExtractor> {
    match framework {
        TestFramework::GoogleTest => Box::new(gtest::GoogleTestExtractor),
        TestFramework::Catch2 => Box::new(catch::CatchExtractor::new(TestFramework::Catch2)),
        TestFramework::Doctest => Box::new(catch::CatchExtractor::new(TestFramework::Doctest)),
        TestFramework::BoostTest => Box::new(boost::BoostTestExtractor),
        TestFramework::CppUnit => Box::new(cppunit::CppUnitExtractor),
    }
}

/// Extracts the test cases of `text`, written in `framework`, ordered by line.
pub fn analyze(text: &str, framework: TestFramework) -> Vec<TestCase> {
    let lines: Vec<&str> = text.lines().collect();
    let mut tests = extractor_for(framework).extract_tests(&lines);
    tests.sort_by_key(|t| t.start_line);
    debug!("Extracted {} {} test cases", tests.len(), framework.display_name());
    tests
}

/// Marks every line that is entirely commented out.
pub(crate) fn comment_mask(lines: &[&str]) -> Vec<bool> {
    let mut counter = BraceCounter::default();
    lines
        .iter()
        .map(|line| {
            let inside = counter.in_block_comment();
            counter.delta(line);
            let trimmed = line.trim_start();
            inside || trimmed.starts_with("//") || trimmed.starts_with("/*")
        })
        .collect()
}

/// Collects the assertion kinds used on the lines of `range`.
pub(crate) fn collect_assertions(lines: &[&str], range: LineRange) -> BTreeSet<AssertionKind> {
    let end = range.end.min(lines.len().saturating_sub(1));
    let mut kinds = BTreeSet::new();
    if range.start > end {
        return kinds;
    }
    let mask = comment_mask(&lines[range.start..=end]);

    for (line, commented) in lines[range.start..=end].iter().zip(mask) {
        if commented {
            continue;
        }
        let code = line.split("//").next().unwrap_or(line);
        for caps in RE_CALL.captures_iter(code) {
            if let Some(kind) = AssertionKind::from_macro(&caps[1]) {
                kinds.insert(kind);
            }
        }
    }
    kinds
}

/// Finds the braced body of a test whose head starts at `start`.
///
/// The opening brace must follow the head within a few lines, so a head
/// terminated by `;` does not borrow the next test's body.
pub(crate) fn find_body(lines: &[&str], start: usize) -> Option<LineRange> {
    let (open, close) = find_block(lines, start)?;
    if open > start + 3 {
        return None;
    }
    let head_ends_statement = lines[start..open]
        .iter()
        .any(|l| l.trim_end().ends_with(';'));
    if head_ends_statement {
        return None;
    }
    Some(LineRange::new(open, close))
}

/// Returns the comma-separated arguments of the first call starting at
/// `column` on line `start`. Arguments may span lines; commas inside nested
/// brackets or string literals do not split.
pub(crate) fn macro_arguments(lines: &[&str], start: usize, column: usize) -> Option<Vec<String>> {
    let mut text = String::new();
    for (offset, line) in lines[start..].iter().take(8).enumerate() {
        let part = if offset == 0 { line.get(column..)? } else { line };
        text.push_str(part);
        text.push(' ');
        if let Some(args) = split_arguments(&text) {
            return Some(args);
        }
    }
    None
}

/// Splits the argument list of the first parenthesized group in `text`.
/// Returns `None` while the group is still open.
fn split_arguments(text: &str) -> Option<Vec<String>> {
    let open = text.find('(')?;
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut args = Vec::new();
    let mut current = String::new();

    for c in text[open..].chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' | '<' => {
                depth += 1;
                if depth > 1 {
                    current.push(c);
                }
            }
            ')' | ']' | '}' | '>' => {
                depth -= 1;
                if depth == 0 {
                    args.push(current.trim().to_string());
                    return Some(args.into_iter().filter(|a| !a.is_empty()).collect());
                }
                current.push(c);
            }
            ',' if depth == 1 => args.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    None
}

/// Returns the contents of a string literal argument, or `None` when the
/// argument is not a plain literal.
pub(crate) fn unquote(arg: &str) -> Option<String> {
    let arg = arg.trim();
    let inner = arg.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.replace("\\\"", "\"").replace("\\\\", "\\"))
}
