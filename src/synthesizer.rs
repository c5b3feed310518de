//! Doxygen comment synthesis.
//!
//! Every block is a pure function of a [`SourceUnit`] and, for test units, the
//! [`TestCase`] bound to it. Descriptions come from identifier naming
//! conventions and, for tests, from the assertion inventory.

use crate::extractor::TestCase;
use crate::parser::{SourceUnit, UnitKind};
use crate::signature::{collapse_whitespace, operator_symbol, FunctionSignature};

/// A synthesized documentation block.
///
/// Lines carry the target indentation but no line terminator; the first line
/// is the `/**` opener and the last the ` */` closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    lines: Vec<String>,
}

impl CommentBlock {
    fn new(indent: &str, body: Vec<String>) -> Self {
        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(format!("{}/**", indent));
        for line in body {
            if line.is_empty() {
                lines.push(format!("{} *", indent));
            } else {
                lines.push(format!("{} * {}", indent, neutralize_terminator(&line)));
            }
        }
        lines.push(format!("{} */", indent));
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

}

/// Breaks up `*/` in text copied from the source, which would otherwise close
/// the block early.
fn neutralize_terminator(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Renders the documentation block for `unit`.
///
/// # Arguments
///
/// * `unit` - The declaration to document
/// * `test` - Test metadata bound to the unit, if it is a test case
///
/// # Returns
///
/// Returns a `CommentBlock` indented like the unit's first line.
pub fn synthesize(unit: &SourceUnit, test: Option<&TestCase>) -> CommentBlock {
    let body = match (test, unit.kind) {
        (Some(test), _) => test_lines(test),
        (None, UnitKind::Function | UnitKind::Method) => match FunctionSignature::parse(&unit.signature) {
            Some(sig) => function_lines(unit, &sig),
            None => generic_lines("Function", &unit.name),
        },
        (None, UnitKind::MacroInvocation) => macro_lines(unit),
        (None, UnitKind::Class) => generic_lines("Class", &unit.name),
        (None, UnitKind::Struct) => generic_lines("Struct", &unit.name),
        (None, UnitKind::Enum) => generic_lines("Enum", &unit.name),
        (None, UnitKind::Variable) => generic_lines("Variable", &unit.name),
        (None, UnitKind::Namespace) => generic_lines("Namespace", &unit.name),
        (None, UnitKind::AccessSpecifier) => generic_lines("Access specifier", &unit.name),
    };
    CommentBlock::new(&unit.indent, body)
}

fn generic_lines(kind: &str, name: &str) -> Vec<String> {
    vec![
        format!("@brief {} {}", kind, name),
        String::new(),
        format!("@details Detailed description of {} {}", kind.to_lowercase(), name),
    ]
}

fn macro_lines(unit: &SourceUnit) -> Vec<String> {
    vec![
        format!("@brief Macro block {}", unit.name),
        String::new(),
        format!("@details Detailed description of {}", collapse_whitespace(&unit.signature)),
    ]
}

/// Special member functions that get a dedicated brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialMember {
    Constructor,
    CopyConstructor,
    MoveConstructor,
    Destructor,
    CopyAssignment,
    MoveAssignment,
}

impl SpecialMember {
    fn classify(sig: &FunctionSignature, class: &str) -> Option<Self> {
        // the single parameter, when it is a reference to the class itself
        let own_type = match sig.parameters.as_slice() {
            [param] => Some(param.type_name.replace(' ', "")),
            _ => None,
        }
        .filter(|ty| {
            let core = ty.trim_start_matches("const").trim_end_matches('&');
            core.split('<').next() == Some(class)
        });
        let is_move = own_type.as_deref().is_some_and(|ty| ty.ends_with("&&"));
        let is_copy = own_type.as_deref().is_some_and(|ty| ty.ends_with('&')) && !is_move;

        if sig.name == class {
            return Some(if is_move {
                SpecialMember::MoveConstructor
            } else if is_copy {
                SpecialMember::CopyConstructor
            } else {
                SpecialMember::Constructor
            });
        }
        if sig.name == format!("~{}", class) {
            return Some(SpecialMember::Destructor);
        }
        if sig.name == "operator=" {
            if is_move {
                return Some(SpecialMember::MoveAssignment);
            }
            if is_copy {
                return Some(SpecialMember::CopyAssignment);
            }
        }
        None
    }

    fn brief(self, class: &str) -> String {
        let what = match self {
            SpecialMember::Constructor => "Constructor",
            SpecialMember::CopyConstructor => "Copy constructor",
            SpecialMember::MoveConstructor => "Move constructor",
            SpecialMember::Destructor => "Destructor",
            SpecialMember::CopyAssignment => "Copy assignment operator",
            SpecialMember::MoveAssignment => "Move assignment operator",
        };
        format!("{} for {}", what, class)
    }

    fn returns_value(self) -> bool {
        matches!(self, SpecialMember::CopyAssignment | SpecialMember::MoveAssignment)
    }
}

fn function_lines(unit: &SourceUnit, sig: &FunctionSignature) -> Vec<String> {
    let class = unit
        .enclosing_class
        .as_deref()
        .or(sig.qualifier.as_deref())
        .unwrap_or("");
    let special = if class.is_empty() { None } else { SpecialMember::classify(sig, class) };

    let brief = match special {
        Some(member) => member.brief(class),
        None if sig.name.starts_with('~') => format!("Destructor for {}", &sig.name[1..]),
        None => describe_identifier(&sig.name),
    };

    let mut lines = vec![format!("@brief {}", brief), String::new(), "@details".to_string()];

    for param in &sig.parameters {
        if param.name.is_empty() {
            lines.push("@param".to_string());
        } else {
            lines.push(format!("@param {}", param.name));
        }
    }

    let is_structor = matches!(
        special,
        Some(SpecialMember::Constructor | SpecialMember::CopyConstructor | SpecialMember::MoveConstructor | SpecialMember::Destructor)
    ) || sig.name.starts_with('~');
    let has_return = !sig.return_type.is_empty() && sig.return_type != "void";
    if has_return && !is_structor && (special.is_none() || special.is_some_and(SpecialMember::returns_value)) {
        lines.push(format!("@return {}", sig.return_type));
    }

    match &sig.throw_spec {
        Some(list) if !list.is_empty() => {
            for exception in list {
                lines.push(format!("@throws {}", exception));
            }
        }
        _ if !sig.is_noexcept => lines.push("@throws std::exception on error".to_string()),
        _ => {}
    }
    lines
}

fn test_lines(test: &TestCase) -> Vec<String> {
    let mut lines = vec![
        format!("@brief {}", test.display_name),
        String::new(),
        "@details".to_string(),
    ];
    if let Some(suite) = &test.suite {
        lines.push(format!("Test Suite: {}", suite));
    }
    if let Some(fixture) = &test.fixture {
        lines.push(format!("Test Fixture: {}", fixture));
    }
    if let Some(tags) = &test.tags {
        lines.push(format!("Test Category: {}", tags));
    }
    if !test.sections.is_empty() {
        lines.push(format!("Sections: {}", test.sections.join(", ")));
    }
    lines.push(format!("Framework: {}", test.framework.display_name()));

    if !test.assertion_kinds.is_empty() {
        lines.push(String::new());
        lines.push("Test Coverage:".to_string());
        for kind in &test.assertion_kinds {
            lines.push(format!("- {}", kind.coverage_phrase()));
        }
    }

    lines.push(String::new());
    lines.push(format!("@test {}", test.test_kind));
    lines
}

/// Splits an identifier into words on underscores and case transitions,
/// keeping acronyms such as `HTTP` in one piece.
pub fn split_identifier(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    for part in name.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();
        for (idx, &c) in chars.iter().enumerate() {
            let prev = idx.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(idx + 1).copied();
            let boundary = match prev {
                Some(p) if c.is_uppercase() => {
                    p.is_lowercase()
                        || p.is_ascii_digit()
                        || (p.is_uppercase() && next.is_some_and(char::is_lowercase))
                }
                Some(p) if c.is_ascii_digit() => p.is_alphabetic() && !p.is_uppercase(),
                _ => false,
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit())
        && word.chars().any(char::is_uppercase)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Leading verbs of function names and the phrase that replaces them.
const VERB_PHRASES: &[(&str, &str)] = &[
    ("get", "Gets the"),
    ("set", "Sets the"),
    ("is", "Checks whether it is"),
    ("has", "Checks whether it has"),
    ("test", "Tests"),
    ("create", "Creates a new"),
    ("init", "Initializes the"),
    ("initialize", "Initializes the"),
    ("update", "Updates the"),
    ("remove", "Removes the"),
    ("delete", "Deletes the"),
    ("add", "Adds a new"),
    ("find", "Finds the"),
    ("compute", "Computes the"),
    ("calculate", "Calculates the"),
    ("load", "Loads the"),
    ("save", "Saves the"),
];

/// Describes a function or method name as a brief sentence.
///
/// ```
/// use doxygen_from_source::synthesizer::describe_identifier;
///
/// assert_eq!(describe_identifier("getSetting"), "Gets the setting");
/// assert_eq!(describe_identifier("parse_HTTP_header"), "Parse HTTP header");
/// ```
pub fn describe_identifier(name: &str) -> String {
    if let Some(symbol) = operator_symbol(name) {
        return format!("Operator {}", symbol.trim());
    }

    let words: Vec<String> = split_identifier(name)
        .into_iter()
        .map(|w| if is_acronym(&w) { w } else { w.to_lowercase() })
        .collect();
    let Some(first) = words.first() else {
        return name.to_string();
    };

    let rest = words[1..].join(" ");
    if let Some((_, phrase)) = VERB_PHRASES.iter().find(|(verb, _)| verb == first) {
        if rest.is_empty() {
            // bare verbs read better without the article
            return phrase.split_whitespace().next().unwrap_or(phrase).to_string();
        }
        return format!("{} {}", phrase, rest);
    }
    capitalize(&words.join(" "))
}

/// Leading words of test names and the phrase that replaces them.
const TEST_PREFIXES: &[(&str, &str)] = &[
    ("test", "Tests"),
    ("when", "When"),
    ("should", "Should"),
    ("verify", "Verifies"),
    ("check", "Checks"),
    ("ensure", "Ensures"),
    ("validate", "Validates"),
];

/// Describes a test identifier such as `TestAddition` or `test_addition`.
///
/// Word case is kept, so `TestAddition` reads "Tests Addition". Names without
/// a recognized leading word are lower-cased behind "Tests".
pub fn describe_test_name(name: &str) -> String {
    let words = split_identifier(name);
    let Some(first) = words.first() else {
        return "Tests".to_string();
    };

    let rest = words[1..].join(" ");
    let lowered = first.to_lowercase();
    if let Some((_, phrase)) = TEST_PREFIXES.iter().find(|(word, _)| *word == lowered) {
        if rest.is_empty() {
            return phrase.to_string();
        }
        return format!("{} {}", phrase, rest);
    }
    format!("Tests {}", words.join(" ").to_lowercase())
}
