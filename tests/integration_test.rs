use clap::Parser;
use doxygen_from_source::{
    cli::{self, CliArgs, TestFramework},
    detector::FrameworkDetector,
    extractor::AssertionKind,
    generator::{DocGenerator, GenerateOptions, SourceKind},
    parser::{DeclarationScanner, UnitKind},
    rewriter::RewriteMode,
    scanner::FileScanner,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const WIDGET_HEADER: &str = include_str!("fixtures/widget.hpp");
const GTEST_SOURCE: &str = include_str!("fixtures/math_test.cpp");
const CATCH2_SOURCE: &str = include_str!("fixtures/strings_test.cpp");
const BOOST_SOURCE: &str = include_str!("fixtures/calculator_suite.cpp");
const CPPUNIT_SOURCE: &str = include_str!("fixtures/string_fixture_test.cpp");
const DOCTEST_SOURCE: &str = include_str!("fixtures/vector_doctest.cpp");

/// Helper function to create a temporary C++ project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn header_options(mode: RewriteMode) -> GenerateOptions {
    GenerateOptions { mode, source_kind: SourceKind::Header, ..Default::default() }
}

fn source_options() -> GenerateOptions {
    GenerateOptions { source_kind: SourceKind::Source, ..Default::default() }
}

/// Every line of `original` appears in `rewritten`, in order.
fn is_subsequence(original: &str, rewritten: &str) -> bool {
    let mut out = rewritten.lines();
    original.lines().all(|line| out.any(|candidate| candidate == line))
}

#[test]
fn test_header_end_to_end_generation() {
    let generated = DocGenerator::generate(WIDGET_HEADER, &header_options(RewriteMode::SkipExisting));
    let out = generated.text();

    assert_eq!(generated.framework, None);
    assert_eq!(generated.result.skipped, 1, "Rect already carries a Doxygen block");
    assert!(generated.result.inserted > 0);

    assert!(out.contains("/**\n * @brief Class Widget\n *\n * @details Detailed description of class Widget\n */\nclass Widget {"));
    assert!(out.contains("@brief Enum Mode"));
    assert!(out.contains("    /**\n     * @brief Constructor for Widget\n"));
    assert!(out.contains("@brief Destructor for Widget"));
    assert!(out.contains("@brief Gets the width"));
    assert!(out.contains("     * @param name\n"));
    assert!(out.contains("     * @return bool\n"));

    // the existing block survives verbatim
    assert!(out.contains("/**\n * @brief A rectangle with integer sides.\n */\nstruct Rect {"));
    assert_eq!(out.matches("A rectangle with integer sides.").count(), 1);
}

#[test]
fn test_add_function_block() {
    let generated = DocGenerator::generate("int add(int a, int b);\n", &header_options(RewriteMode::SkipExisting));
    assert_eq!(
        generated.text(),
        "/**\n * @brief Adds\n *\n * @details\n * @param a\n * @param b\n * @return int\n * @throws std::exception on error\n */\nint add(int a, int b);\n"
    );

    let noexcept = DocGenerator::generate("int add(int a, int b) noexcept;\n", &header_options(RewriteMode::SkipExisting));
    assert!(noexcept.text().contains(" * @return int\n"));
    assert!(!noexcept.text().contains("@throws"));
}

#[test]
fn test_skip_mode_is_idempotent() {
    let options = header_options(RewriteMode::SkipExisting);
    for text in [WIDGET_HEADER, GTEST_SOURCE, CATCH2_SOURCE, BOOST_SOURCE] {
        let options = if text == WIDGET_HEADER { options } else { source_options() };
        let once = DocGenerator::generate(text, &options);
        let twice = DocGenerator::generate(once.text(), &options);
        assert_eq!(twice.text(), once.text());
        assert_eq!(twice.result.inserted, 0);
        assert!(!twice.result.is_changed());
    }
}

#[test]
fn test_skip_mode_only_adds_lines() {
    let generated = DocGenerator::generate(WIDGET_HEADER, &header_options(RewriteMode::SkipExisting));
    assert!(is_subsequence(WIDGET_HEADER, generated.text()));
    assert!(generated.result.edits.iter().all(|edit| edit.is_insertion()));
}

#[test]
fn test_comments_follow_access_specifiers() {
    let generated = DocGenerator::generate(WIDGET_HEADER, &header_options(RewriteMode::SkipExisting));
    let lines: Vec<&str> = generated.text().lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        if matches!(line.trim(), "public:" | "private:" | "protected:") {
            assert!(
                idx > 0 && !lines[idx - 1].trim().ends_with("*/"),
                "no comment may sit directly above `{}`",
                line.trim()
            );
        }
    }
    assert!(generated.text().contains("public:\n    /**\n"));
    assert!(generated.text().contains("private:\n    /**\n"));
}

#[test]
fn test_enhance_mode_replaces_existing_block() {
    let text = "/**\n * @brief Old text.\n * @details More old text.\n */\nint value();\n";
    let units = DeclarationScanner::scan(text);
    assert_eq!(units[0].existing_comment.map(|r| r.len()), Some(4));

    let skipped = DocGenerator::generate(text, &header_options(RewriteMode::SkipExisting));
    assert_eq!(skipped.text(), text);
    assert_eq!(skipped.result.skipped, 1);

    let enhanced = DocGenerator::generate(text, &header_options(RewriteMode::EnhanceExisting));
    assert_eq!(enhanced.result.replaced, 1);
    assert!(!enhanced.text().contains("Old text"));
    assert!(enhanced.text().contains(" * @brief Value\n"));
    assert!(enhanced.text().ends_with(" */\nint value();\n"));
    assert_eq!(enhanced.text().matches("/**").count(), 1);
}

#[test]
fn test_gtest_end_to_end_generation() {
    let detection = FrameworkDetector::detect(GTEST_SOURCE);
    assert_eq!(detection.framework(), Some(TestFramework::GoogleTest));

    let generated = DocGenerator::generate(GTEST_SOURCE, &source_options());
    assert_eq!(generated.tests.len(), 2);

    let addition = &generated.tests[0];
    assert_eq!(addition.suite.as_deref(), Some("MathTest"));
    assert_eq!(addition.fixture, None);
    assert_eq!(addition.display_name, "Tests Addition");
    assert_eq!(
        addition.assertion_kinds.iter().copied().collect::<Vec<_>>(),
        vec![AssertionKind::Equality, AssertionKind::Inequality]
    );

    let expected = "/**
 * @brief Tests Addition
 *
 * @details
 * Test Suite: MathTest
 * Framework: Google Test
 *
 * Test Coverage:
 * - Covers equality comparison
 * - Covers inequality comparison
 *
 * @test TEST
 */
TEST(MathTest, TestAddition) {
";
    assert!(generated.text().contains(expected), "{}", generated.text());

    let pop = &generated.tests[1];
    assert_eq!(pop.fixture.as_deref(), Some("StackTest"));
    assert_eq!(pop.test_kind, "TEST_F");
    assert!(pop.assertion_kinds.contains(&AssertionKind::ThrowExpected));
    assert!(generated.text().contains(" * Test Fixture: StackTest\n"));
}

#[test]
fn test_catch2_end_to_end_generation() {
    let generated = DocGenerator::generate(CATCH2_SOURCE, &source_options());
    assert_eq!(generated.framework, Some(TestFramework::Catch2));
    assert_eq!(generated.tests.len(), 1);
    assert_eq!(generated.tests[0].display_name, "String operations");

    let out = generated.text();
    assert!(out.contains(" * @brief String operations\n"));
    assert!(out.contains(" * Test Category: [string]\n"));
    assert!(out.contains(" * Sections: length, append\n"));
    assert!(out.contains(" * Framework: Catch2\n"));
    assert!(out.contains(" * @test TEST_CASE\n */\nTEST_CASE(\"String operations\", \"[string]\") {"));
    // sections are folded into the test case, not documented on their own
    assert_eq!(out.matches("/**").count(), 1);
}

#[test]
fn test_boost_end_to_end_generation() {
    let generated = DocGenerator::generate(BOOST_SOURCE, &source_options());
    assert_eq!(generated.framework, Some(TestFramework::BoostTest));

    let names: Vec<&str> = generated.tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["testAddition", "testStorage"]);
    assert!(generated.tests.iter().all(|t| t.suite.as_deref() == Some("CalculatorSuite")));
    assert_eq!(generated.tests[1].fixture.as_deref(), Some("StorageFixture"));

    let out = generated.text();
    assert!(out.contains(" * @brief Tests Addition\n"));
    assert!(out.contains(" * Framework: Boost.Test\n"));
    assert!(out.contains(" * - Covers exception throwing behavior\n"));
    assert!(out.contains(" * @test BOOST_FIXTURE_TEST_CASE\n */\nBOOST_FIXTURE_TEST_CASE(testStorage, StorageFixture) {"));
}

#[test]
fn test_cppunit_end_to_end_generation() {
    let generated = DocGenerator::generate(CPPUNIT_SOURCE, &source_options());
    assert_eq!(generated.framework, Some(TestFramework::CppUnit));

    let names: Vec<&str> = generated.tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["testLength", "testConcatenation"]);

    let out = generated.text();
    assert!(out.contains("     * @brief Tests Length\n"));
    assert!(out.contains("     * @test CPPUNIT_TEST\n     */\n    void testLength() {"));
    // the out-of-line definition carries the test block, the declaration a plain one
    assert!(out.contains(
        "/**\n * @brief Tests Concatenation\n *\n * @details\n * Test Suite: StringTest\n * Test Fixture: StringTest\n * Framework: CppUnit\n *\n * Test Coverage:\n * - Covers equality comparison\n *\n * @test CPPUNIT_TEST\n */\nvoid StringTest::testConcatenation() {"
    ));
    assert_eq!(out.matches(" * @test CPPUNIT_TEST\n").count(), 2);
    assert!(is_subsequence(CPPUNIT_SOURCE, &out));

    let again = DocGenerator::generate(&out, &source_options());
    assert_eq!(again.text(), out);
}

#[test]
fn test_doctest_end_to_end_generation() {
    let generated = DocGenerator::generate(DOCTEST_SOURCE, &source_options());
    assert_eq!(generated.framework, Some(TestFramework::Doctest));
    assert_eq!(generated.tests.len(), 2);
    assert_eq!(generated.tests[0].suite.as_deref(), Some("containers"));
    assert_eq!(generated.tests[1].suite, None);

    let out = generated.text();
    assert!(out.contains(
        "    /**\n     * @brief vector grows on push\n     *\n     * @details\n     * Test Suite: containers\n     * Sections: clear empties it\n     * Framework: doctest\n     *\n     * Test Coverage:\n     * - Covers equality comparison\n     * - Covers boolean true condition\n     *\n     * @test TEST_CASE\n     */\n    TEST_CASE(\"vector grows on push\") {"
    ));
    assert!(out.contains(" * - Covers ordering comparison\n *\n * @test TEST_CASE\n */\nTEST_CASE(\"reserve keeps size\") {"));
    // the suite block is a scope, not a documented macro
    assert!(out.contains("#include <vector>\n\nTEST_SUITE(\"containers\") {"));
    assert_eq!(out.matches("/**").count(), 2);
}

#[test]
fn test_test_name_cannot_close_the_comment() {
    let text = "#include <catch2/catch.hpp>\n\nTEST_CASE(\"parses a */ b\", \"[x]\") {\n    REQUIRE(true);\n}\n";
    let out = DocGenerator::generate(text, &source_options()).text().to_string();

    let (block, _) = out.split_once("TEST_CASE(").unwrap();
    assert_eq!(block.matches("*/").count(), 1);
    assert!(block.contains(" * @brief parses a * / b\n"));
    assert!(out.ends_with("TEST_CASE(\"parses a */ b\", \"[x]\") {\n    REQUIRE(true);\n}\n"));
}

#[test]
fn test_generation_is_deterministic() {
    let first = DocGenerator::generate(GTEST_SOURCE, &source_options());
    let second = DocGenerator::generate(GTEST_SOURCE, &source_options());
    assert_eq!(first.text(), second.text());
    assert_eq!(first.result.edits, second.result.edits);
}

#[test]
fn test_scanner_finds_widget_units() {
    let units = DeclarationScanner::scan(WIDGET_HEADER);
    let widget = units.iter().find(|u| u.name == "Widget" && u.kind == UnitKind::Class).unwrap();
    let methods: Vec<&str> = units
        .iter()
        .filter(|u| u.kind == UnitKind::Method && u.enclosing_class.as_deref() == Some("Widget"))
        .map(|u| u.name.as_str())
        .collect();

    assert_eq!(methods, vec!["Widget", "Widget", "~Widget", "getWidth", "setName", "isVisible"]);
    assert!(units
        .iter()
        .filter(|u| u.enclosing_class.as_deref() == Some("Widget"))
        .all(|u| widget.start_line < u.start_line && u.end_line <= widget.end_line));
}

#[test]
fn test_cli_dry_run_leaves_files_untouched() {
    let project = create_test_project(vec![("include/widget.hpp", WIDGET_HEADER)]);
    let header = project.path().join("include/widget.hpp");

    let args = CliArgs::try_parse_from([
        "doxygen-from-source",
        "--input-file",
        header.to_str().unwrap(),
        "--dry-run",
        "--diff",
    ])
    .unwrap();
    let args = cli::parse_args_from_parsed(args).unwrap();
    cli::run(args).unwrap();

    assert_eq!(std::fs::read_to_string(&header).unwrap(), WIDGET_HEADER);
}

#[test]
fn test_cli_project_writes_output_tree_and_report() {
    let project = create_test_project(vec![
        ("include/widget.hpp", WIDGET_HEADER),
        ("src/math_test.cpp", GTEST_SOURCE),
        ("build/generated.hpp", "int generated;\n"),
    ]);
    let out_dir = project.path().join("documented");
    let report = project.path().join("report.json");

    let args = CliArgs::try_parse_from([
        "doxygen-from-source",
        "--project",
        project.path().to_str().unwrap(),
        "--output",
        out_dir.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
        "--report-format",
        "json",
    ])
    .unwrap();
    cli::run(cli::parse_args_from_parsed(args).unwrap()).unwrap();

    let documented = std::fs::read_to_string(out_dir.join("src/math_test.cpp")).unwrap();
    assert!(documented.contains(" * @brief Tests Addition\n"));
    assert!(out_dir.join("include/widget.hpp").is_file());
    assert!(!out_dir.join("build/generated.hpp").exists());
    assert_eq!(
        std::fs::read_to_string(project.path().join("src/math_test.cpp")).unwrap(),
        GTEST_SOURCE
    );

    let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed["totals"]["files"], 2);
    assert_eq!(parsed["totals"]["tests"], 2);
    assert_eq!(parsed["files"][1]["framework"], "gtest");
}

#[test]
fn test_cli_in_place_rewrite_is_stable() {
    let project = create_test_project(vec![("tests/strings_test.cpp", CATCH2_SOURCE)]);
    let dir = project.path().join("tests");

    for _ in 0..2 {
        let args = CliArgs::try_parse_from(["doxygen-from-source", "-d", dir.to_str().unwrap()]).unwrap();
        cli::run(cli::parse_args_from_parsed(args).unwrap()).unwrap();
    }

    let rewritten = std::fs::read_to_string(dir.join("strings_test.cpp")).unwrap();
    assert_eq!(rewritten.matches("@brief String operations").count(), 1);
    assert!(is_subsequence(CATCH2_SOURCE, &rewritten));
}

#[test]
fn test_cli_rejects_bad_input() {
    let project = create_test_project(vec![("notes.txt", "hello")]);

    let missing = CliArgs::try_parse_from(["doxygen-from-source", "-f", "does/not/exist.hpp"]).unwrap();
    assert!(cli::parse_args_from_parsed(missing).is_err());

    let text_file = project.path().join("notes.txt");
    let unsupported = CliArgs::try_parse_from(["doxygen-from-source", "-f", text_file.to_str().unwrap()]).unwrap();
    let err = cli::parse_args_from_parsed(unsupported).unwrap_err();
    assert!(err.to_string().contains("unsupported file type"));

    let none = CliArgs::try_parse_from(["doxygen-from-source"]).unwrap();
    assert!(cli::parse_args_from_parsed(none).is_err());
}

#[test]
fn test_file_scanner_on_fixture_tree() {
    let project = create_test_project(vec![
        ("a.hpp", WIDGET_HEADER),
        ("nested/b.cpp", GTEST_SOURCE),
        (".cache/c.hpp", "int c;\n"),
    ]);
    let result = FileScanner::new(project.path().to_path_buf()).scan().unwrap();
    assert_eq!(result.files.len(), 2);
}
