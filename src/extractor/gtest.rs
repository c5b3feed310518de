use super::{collect_assertions, comment_mask, find_body, TestCase, TestCaseExtractor};
use crate::cli::TestFramework;
use crate::synthesizer::describe_test_name;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RE_GTEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(TEST|TEST_F|TEST_P|TYPED_TEST|TYPED_TEST_P)\s*\(\s*(\w+)\s*,\s*(\w+)\s*\)").unwrap()
});

/// Extractor for GoogleTest `TEST`/`TEST_F`/`TEST_P`/`TYPED_TEST` cases.
///
/// `TEST(Suite, Name)` names a plain suite. The fixture forms take the fixture
/// class as their first argument, so the fixture equals the suite.
pub struct GoogleTestExtractor;

impl TestCaseExtractor for GoogleTestExtractor {
    fn extract_tests(&self, lines: &[&str]) -> Vec<TestCase> {
        let mask = comment_mask(lines);
        let mut tests = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }
            let Some(caps) = RE_GTEST.captures(line) else {
                continue;
            };

            let kind = &caps[1];
            let suite = caps[2].to_string();
            let name = caps[3].to_string();
            let fixture = (kind != "TEST").then(|| suite.clone());

            let body_range = find_body(lines, idx);
            let assertion_kinds = body_range
                .map(|range| collect_assertions(lines, range))
                .unwrap_or_default();

            debug!("Found {} {}.{} at line {}", kind, suite, name, idx + 1);
            tests.push(TestCase {
                display_name: describe_test_name(&name),
                name,
                suite: Some(suite),
                fixture,
                framework: TestFramework::GoogleTest,
                test_kind: kind.to_string(),
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
