use super::{
    collect_assertions, comment_mask, find_body, macro_arguments, unquote, TestCase,
    TestCaseExtractor,
};
use crate::cli::TestFramework;
use crate::parser::{find_block, LineRange};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static RE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(TEST_CASE_METHOD|TEST_CASE_FIXTURE|TEMPLATE_TEST_CASE|TEST_CASE_TEMPLATE",
        r"|TEST_CASE|SCENARIO)\s*\("
    ))
    .unwrap()
});

static RE_SUITE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*(?:DOCTEST_)?TEST_SUITE\s*\(\s*"([^"]*)"\s*\)"#).unwrap());

static RE_SUITE_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*TEST_SUITE_BEGIN\s*\(\s*"([^"]*)"\s*\)"#).unwrap());

static RE_SUITE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*TEST_SUITE_END\s*\(").unwrap());

static RE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(SECTION|SUBCASE|GIVEN|WHEN|THEN|AND_GIVEN|AND_WHEN|AND_THEN)\s*\(\s*"((?:[^"\\]|\\.)*)""#)
        .unwrap()
});

/// Extractor for the string-named test dialects, Catch2 and doctest.
///
/// Both spell tests as `TEST_CASE("name", ...)`; the literal name is kept
/// verbatim as the display name. doctest additionally groups tests into
/// suites, either with a braced `TEST_SUITE("x") { }` block or with a
/// `TEST_SUITE_BEGIN("x")`/`TEST_SUITE_END()` region.
pub struct CatchExtractor {
    framework: TestFramework,
}

impl CatchExtractor {
    pub fn new(framework: TestFramework) -> Self {
        Self { framework }
    }

    /// Collects doctest suite regions as `(range, name)` pairs.
    fn suite_regions(lines: &[&str], mask: &[bool]) -> Vec<(LineRange, String)> {
        let mut regions = Vec::new();
        let mut open_region: Option<(usize, String)> = None;

        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }
            if let Some(caps) = RE_SUITE_BLOCK.captures(line) {
                if let Some((open, close)) = find_block(lines, idx) {
                    regions.push((LineRange::new(open, close), caps[1].to_string()));
                }
            } else if let Some(caps) = RE_SUITE_BEGIN.captures(line) {
                open_region = Some((idx, caps[1].to_string()));
            } else if RE_SUITE_END.is_match(line) {
                if let Some((start, name)) = open_region.take() {
                    regions.push((LineRange::new(start, idx), name));
                }
            }
        }
        if let Some((start, name)) = open_region {
            regions.push((LineRange::new(start, lines.len().saturating_sub(1)), name));
        }
        regions
    }

    fn sections(lines: &[&str], body: LineRange) -> Vec<String> {
        let end = body.end.min(lines.len().saturating_sub(1));
        let mut sections = Vec::new();
        for line in &lines[body.start..=end] {
            for caps in RE_SECTION.captures_iter(line) {
                let label = match &caps[1] {
                    "SECTION" | "SUBCASE" => caps[2].to_string(),
                    keyword => format!("{}: {}", bdd_label(keyword), &caps[2]),
                };
                if !sections.contains(&label) {
                    sections.push(label);
                }
            }
        }
        sections
    }
}

fn bdd_label(keyword: &str) -> &'static str {
    match keyword {
        "GIVEN" => "Given",
        "WHEN" => "When",
        "THEN" => "Then",
        "AND_GIVEN" => "And given",
        "AND_WHEN" => "And when",
        _ => "And",
    }
}

/// Returns the argument if it is a Catch2 tag literal like `"[math][fast]"`.
fn tag_literal(arg: Option<&String>) -> Option<String> {
    let tags = unquote(arg?)?;
    tags.starts_with('[').then_some(tags)
}

impl TestCaseExtractor for CatchExtractor {
    fn extract_tests(&self, lines: &[&str]) -> Vec<TestCase> {
        let mask = comment_mask(lines);
        let suites = if self.framework == TestFramework::Doctest {
            Self::suite_regions(lines, &mask)
        } else {
            Vec::new()
        };
        let mut tests = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if mask[idx] {
                continue;
            }
            let Some(caps) = RE_CASE.captures(line) else {
                continue;
            };
            let kind = caps[1].to_string();
            let Some(args) = macro_arguments(lines, idx, caps.get(1).map_or(0, |m| m.start())) else {
                continue;
            };

            let (fixture, name_arg, tag_arg) = match kind.as_str() {
                "TEST_CASE_METHOD" | "TEST_CASE_FIXTURE" => {
                    (args.first().cloned(), args.get(1), args.get(2))
                }
                _ => (None, args.first(), args.get(1)),
            };
            let Some(name) = name_arg.and_then(|a| unquote(a)) else {
                debug!("Skipping {} at line {}: name is not a string literal", kind, idx + 1);
                continue;
            };

            let body_range = find_body(lines, idx);
            let (assertion_kinds, sections) = match body_range {
                Some(range) => (collect_assertions(lines, range), Self::sections(lines, range)),
                None => Default::default(),
            };

            // innermost suite wins
            let suite = suites
                .iter()
                .filter(|(range, _)| range.contains(idx))
                .min_by_key(|(range, _)| range.len())
                .map(|(_, name)| name.clone());

            debug!("Found {} \"{}\" at line {}", kind, name, idx + 1);
            tests.push(TestCase {
                display_name: name.clone(),
                name,
                suite,
                fixture,
                framework: self.framework,
                test_kind: kind,
                assertion_kinds,
                tags: tag_literal(tag_arg),
                sections,
                body_range,
                start_line: idx,
            });
        }
        tests
    }
}
