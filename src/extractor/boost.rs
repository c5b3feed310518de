use super::{collect_assertions, comment_mask, find_body, macro_arguments, TestCase, TestCaseExtractor};
use crate::cli::TestFramework;
use crate::synthesizer::describe_test_name;
use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

static RE_SUITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*BOOST_(AUTO|FIXTURE)_TEST_SUITE\s*\(\s*(\w+)\s*(?:,\s*([\w:<>, ]+?)\s*)?[,)]").unwrap()
});

static RE_SUITE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*BOOST_AUTO_TEST_SUITE_END\s*\(").unwrap());

static RE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(BOOST_AUTO_TEST_CASE_TEMPLATE|BOOST_AUTO_TEST_CASE|BOOST_FIXTURE_TEST_CASE",
        r"|BOOST_DATA_TEST_CASE_F|BOOST_DATA_TEST_CASE)\s*\("
    ))
    .unwrap()
});

/// Extractor for Boost.Test automatic registration macros.
///
/// Suites nest: a test's suite is the `/`-joined path of the enclosing
/// `BOOST_AUTO_TEST_SUITE`/`BOOST_FIXTURE_TEST_SUITE` regions, and the
/// innermost fixture suite provides the fixture unless the case names its own.
pub struct BoostTestExtractor;

struct SuiteFrame {
    name: String,
    fixture: Option<String>,
}

impl TestCaseExtractor for BoostTestExtractor {
    fn extract_tests(&self, lines: &[&str]) -> Vec<TestCase> {
        let mask = comment_mask(lines);
        let mut stack: Vec<SuiteFrame> = Vec::new();
        let mut tests = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }

            if let Some(caps) = RE_SUITE.captures(line) {
                let fixture = if &caps[1] == "FIXTURE" {
                    caps.get(3).map(|m| m.as_str().trim().to_string())
                } else {
                    None
                };
                stack.push(SuiteFrame { name: caps[2].to_string(), fixture });
                continue;
            }
            if RE_SUITE_END.is_match(line) {
                if stack.pop().is_none() {
                    warn!("Unbalanced BOOST_AUTO_TEST_SUITE_END at line {}", idx + 1);
                }
                continue;
            }

            let Some(caps) = RE_CASE.captures(line) else {
                continue;
            };
            let kind = caps[1].to_string();
            let Some(args) = macro_arguments(lines, idx, caps.get(1).map_or(0, |m| m.start())) else {
                continue;
            };

            let (name, own_fixture) = match kind.as_str() {
                "BOOST_FIXTURE_TEST_CASE" => (args.first(), args.get(1).cloned()),
                "BOOST_DATA_TEST_CASE_F" => (args.get(1), args.first().cloned()),
                _ => (args.first(), None),
            };
            let Some(name) = name.cloned() else {
                continue;
            };

            let suite = (!stack.is_empty()).then(|| {
                stack.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join("/")
            });
            let fixture = own_fixture.or_else(|| stack.iter().rev().find_map(|f| f.fixture.clone()));

            let body_range = find_body(lines, idx);
            let assertion_kinds = body_range
                .map(|range| collect_assertions(lines, range))
                .unwrap_or_default();

            debug!("Found {} {} at line {}", kind, name, idx + 1);
            tests.push(TestCase {
                display_name: describe_test_name(&name),
                name,
                suite,
                fixture,
                framework: TestFramework::BoostTest,
                test_kind: kind,
                assertion_kinds,
                tags: None,
                sections: Vec::new(),
                body_range,
                start_line: idx,
            });
        }
        tests
    }
}
