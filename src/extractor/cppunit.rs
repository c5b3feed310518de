use super::{collect_assertions, comment_mask, find_body, AssertionKind, TestCase, TestCaseExtractor};
use crate::cli::TestFramework;
use crate::synthesizer::describe_test_name;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RE_SUITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*CPPUNIT_TEST_SUITE\s*\(\s*(\w+)\s*\)").unwrap());

static RE_REGISTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(CPPUNIT_TEST_EXCEPTION|CPPUNIT_TEST_FAIL|CPPUNIT_TEST)\s*\(\s*(\w+)\s*(?:,\s*([\w:]+)\s*)?\)").unwrap()
});

static RE_METHOD_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:virtual\s+)?void\s+(?:(\w+)::)?(\w+)\s*\(\s*(?:void)?\s*\)").unwrap()
});

/// Extractor for CppUnit fixtures.
///
/// CppUnit tests are ordinary member functions registered between
/// `CPPUNIT_TEST_SUITE(Class)` and `CPPUNIT_TEST_SUITE_END()`. Each
/// registration is matched with the method's definition, either inline in the
/// class or out of line as `Class::method`, and that definition becomes the
/// test's body.
pub struct CppUnitExtractor;

struct Registration {
    suite: String,
    method: String,
    kind: String,
}

impl CppUnitExtractor {
    fn registrations(lines: &[&str], mask: &[bool]) -> Vec<Registration> {
        let mut suite: Option<String> = None;
        let mut found = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }
            if let Some(caps) = RE_SUITE.captures(line) {
                suite = Some(caps[1].to_string());
                continue;
            }
            if let (Some(caps), Some(suite)) = (RE_REGISTRATION.captures(line), &suite) {
                found.push(Registration {
                    suite: suite.clone(),
                    method: caps[2].to_string(),
                    kind: caps[1].to_string(),
                });
            }
        }
        found
    }

    /// Finds the definition line of `suite::method`, preferring a definition
    /// with a body over a bare declaration.
    fn definition(lines: &[&str], mask: &[bool], suite: &str, method: &str) -> Option<usize> {
        let mut declaration = None;
        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }
            let Some(caps) = RE_METHOD_DEF.captures(line) else {
                continue;
            };
            if &caps[2] != method {
                continue;
            }
            if caps.get(1).is_some_and(|q| q.as_str() != suite) {
                continue;
            }
            if find_body(lines, idx).is_some() {
                return Some(idx);
            }
            declaration.get_or_insert(idx);
        }
        declaration
    }
}

impl TestCaseExtractor for CppUnitExtractor {
    fn extract_tests(&self, lines: &[&str]) -> Vec<TestCase> {
        let mask = comment_mask(lines);
        let mut tests = Vec::new();

        for registration in Self::registrations(lines, &mask) {
            let Some(start) = Self::definition(lines, &mask, &registration.suite, &registration.method) else {
                debug!(
                    "No definition found for {}::{}",
                    registration.suite, registration.method
                );
                continue;
            };

            let body_range = find_body(lines, start);
            let mut assertion_kinds = body_range
                .map(|range| collect_assertions(lines, range))
                .unwrap_or_default();
            if registration.kind == "CPPUNIT_TEST_EXCEPTION" {
                assertion_kinds.insert(AssertionKind::ThrowExpected);
            }

            tests.push(TestCase {
                display_name: describe_test_name(&registration.method),
                name: registration.method,
                suite: Some(registration.suite.clone()),
                fixture: Some(registration.suite),
                framework: TestFramework::CppUnit,
                test_kind: registration.kind,
                assertion_kinds,
                tags: None,
                sections: Vec::new(),
                body_range,
                start_line: start,
            });
        }
        tests
    }
}
