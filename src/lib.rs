//! Doxygen comment generator - Structured documentation comments for C++ sources.
//!
//! This library inserts Doxygen comment blocks into C++ headers and sources
//! without a compiler front end. A line-oriented scanner recognizes
//! declarations, test files are classified by dialect and their test cases
//! analyzed, and a rewrite engine merges the synthesized blocks into the text
//! without touching anything else.
//!
//! # Supported Test Frameworks
//!
//! - **Google Test**: `TEST`, `TEST_F`, `TEST_P`, `TYPED_TEST`
//! - **Catch2** and **doctest**: `TEST_CASE`, `SCENARIO`, fixtures, `SECTION`/`SUBCASE`
//! - **Boost.Test**: `BOOST_AUTO_TEST_CASE` and friends inside test suites
//! - **CppUnit**: methods registered with `CPPUNIT_TEST`
//!
//! # Architecture
//!
//! 1. [`parser`] - Partitions C++ text into declaration units
//! 2. [`signature`] - Parses function and variable declarations
//! 3. [`detector`] - Classifies the test dialect of a file
//! 4. [`extractor`] - Extracts per-test metadata for each dialect
//! 5. [`synthesizer`] - Renders one comment block per unit
//! 6. [`rewriter`] - Merges blocks into the original text
//! 7. [`generator`] - Runs the pipeline for one in-memory source
//! 8. [`scanner`] and [`serializer`] - File discovery, output and run reports
//!
//! # Example Usage
//!
//! ```
//! use doxygen_from_source::generator::{DocGenerator, GenerateOptions, SourceKind};
//! use doxygen_from_source::rewriter::RewriteMode;
//!
//! let text = "class Widget {\npublic:\n    int size() const noexcept;\n};\n";
//! let options = GenerateOptions {
//!     mode: RewriteMode::SkipExisting,
//!     source_kind: SourceKind::Header,
//!     ..Default::default()
//! };
//! let generated = DocGenerator::generate(text, &options);
//! assert!(generated.text().contains("@brief Class Widget"));
//! assert!(generated.text().contains("@return int"));
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod scanner;
pub mod parser;
pub mod signature;
pub mod detector;
pub mod extractor;
pub mod synthesizer;
pub mod rewriter;
pub mod generator;
pub mod serializer;
pub mod error;
