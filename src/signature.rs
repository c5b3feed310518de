//! Lightweight parsing of C++ declaration heads.
//!
//! A declaration head is the text of a declaration up to (but excluding) its
//! terminating `{` or `;`, with line breaks collapsed to single spaces. Both the
//! declaration scanner and the comment synthesizer parse heads through this
//! module so that classification and rendering always agree.

use regex::Regex;
use std::sync::LazyLock;

static RE_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\[\[[^\]]*\]\]|alignas\s*\([^)]*\)|__declspec\s*\([^)]*\))\s*").unwrap());

static RE_OPERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[A-Za-z_]\w*::)*operator\b").unwrap());

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_]\w*(?:<[^<>()]*>)?::)*~?[A-Za-z_]\w*$").unwrap()
});

static RE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s:<>,*&]*$").unwrap());

static RE_QUALIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:\s*(?:const|volatile|&&|&|override|final|try",
        r"|noexcept(?:\s*\([^)]*\))?",
        r"|throw\s*\([^)]*\)",
        r"|->\s*[\w:<>,*&\s]+?",
        r"|=\s*(?:0|default|delete)))*\s*$"
    ))
    .unwrap()
});

static RE_TRAILING_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"->\s*([\w:<>,*&\s]+?)\s*(?:\boverride\b|\bfinal\b|\bnoexcept\b|=|$)").unwrap()
});

static RE_THROW_SPEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bthrow\s*\(([^)]*)\)").unwrap());

static RE_NOEXCEPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnoexcept\b(?:\s*\(\s*(\w+)\s*\))?").unwrap());

static RE_SPECIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:virtual|inline|explicit|constexpr|consteval|constinit|static|friend",
        r"|extern|thread_local|register|mutable)\b"
    ))
    .unwrap()
});

static RE_FUNCTION_POINTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*[*&]\s*([A-Za-z_]\w*)\s*\)").unwrap());

static RE_TRAILING_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_]\w*)$").unwrap());

static RE_ARRAY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\[[^\]]*\])+$").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Words that look like identifiers in a head but can never name a declaration.
const STATEMENT_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "goto",
    "break", "continue", "throw", "new", "delete", "sizeof", "alignof", "decltype",
    "catch", "try", "static_assert", "co_return", "co_yield", "co_await", "noexcept",
    "typeid", "using", "typedef",
];

const BUILTIN_TYPES: &[&str] = &[
    "void", "bool", "char", "wchar_t", "char8_t", "char16_t", "char32_t", "short", "int",
    "long", "float", "double", "signed", "unsigned", "auto",
];

const TYPE_QUALIFIERS: &[&str] = &["const", "volatile", "struct", "class", "enum", "typename", "union"];

/// A parsed function, method, constructor or operator head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Unqualified name (`bar` for `Foo::bar`, `operator=` for operators)
    pub name: String,
    /// Class qualifier of an out-of-line definition (`Foo` for `Foo::bar`)
    pub qualifier: Option<String>,
    /// Return type with storage and function specifiers removed
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub is_noexcept: bool,
    /// Entries of a dynamic exception specification, `throw(A, B)`
    pub throw_spec: Option<Vec<String>>,
    pub is_static: bool,
    pub is_const: bool,
}

/// One entry of a parameter list. `name` is empty for unnamed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// A parsed variable or data-member head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub name: String,
    pub type_name: String,
    pub is_static: bool,
    pub is_constexpr: bool,
}

impl FunctionSignature {
    /// Parses a function head, returning `None` when the text is not shaped
    /// like a function declaration.
    pub fn parse(head: &str) -> Option<Self> {
        let text = strip_declaration_prefix(head);
        let (name_start, open) = locate_name(&text)?;
        let close = matching_close(&text, open)?;

        let full_name = collapse_whitespace(&text[name_start..open]);
        let is_operator = RE_OPERATOR.is_match(&full_name);
        if !is_operator && !RE_NAME.is_match(&full_name) {
            return None;
        }

        let (qualifier, name) = split_qualifier(&full_name, is_operator);
        if STATEMENT_KEYWORDS.contains(&name.as_str()) {
            return None;
        }

        let prefix = text[..name_start].trim();
        if !RE_PREFIX.is_match(prefix) {
            return None;
        }
        if let Some(last) = prefix.split_whitespace().last() {
            if STATEMENT_KEYWORDS.contains(&last) {
                return None;
            }
        }

        let qualifiers = text[close + 1..].trim();
        if !qualifiers.starts_with(':') && !RE_QUALIFIERS.is_match(qualifiers) {
            return None;
        }

        let parameters = parse_parameters(&text[open + 1..close]);

        let mut return_type = clean_type(prefix);
        if return_type == "auto" {
            if let Some(caps) = RE_TRAILING_RETURN.captures(qualifiers) {
                return_type = collapse_whitespace(&caps[1]);
            }
        }

        let throw_spec = RE_THROW_SPEC.captures(qualifiers).map(|caps| {
            caps[1]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        let is_noexcept = match RE_NOEXCEPT.captures(qualifiers) {
            Some(caps) => caps.get(1).map_or(true, |arg| arg.as_str() != "false"),
            // `throw()` is the pre-C++11 spelling of a non-throwing function
            None => matches!(&throw_spec, Some(list) if list.is_empty()),
        };

        Some(Self {
            name,
            qualifier,
            return_type,
            parameters,
            is_noexcept,
            throw_spec,
            is_static: has_word(prefix, "static"),
            is_const: has_word(qualifiers.split(':').next().unwrap_or(""), "const"),
        })
    }

    /// Returns true when every argument looks like a value rather than a
    /// parameter declaration, as in `Widget w(3, "name");`.
    pub fn looks_like_constructor_call(&self) -> bool {
        !self.parameters.is_empty()
            && self.parameters.iter().all(|p| {
                let t = p.type_name.trim();
                t.starts_with(|c: char| c.is_ascii_digit() || c == '"' || c == '\'' || c == '-')
                    || matches!(t, "true" | "false" | "nullptr")
            })
    }

    pub fn is_operator(&self) -> bool {
        operator_symbol(&self.name).is_some()
    }
}

/// The text after the `operator` keyword, or `None` when `name` only starts
/// with those letters, as in `operatorCount`.
pub fn operator_symbol(name: &str) -> Option<&str> {
    let rest = name.strip_prefix("operator")?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

impl Parameter {
    /// Parses one comma-separated entry of a parameter list.
    pub fn parse(raw: &str) -> Option<Self> {
        let without_default = split_top_level(raw, '=')
            .into_iter()
            .next()
            .unwrap_or_default();
        let decl = collapse_whitespace(without_default.trim());
        if decl.is_empty() {
            return None;
        }
        if decl == "..." {
            return Some(Self { type_name: "...".to_string(), name: "...".to_string() });
        }

        if let Some(caps) = RE_FUNCTION_POINTER.captures(&decl) {
            return Some(Self { type_name: decl.clone(), name: caps[1].to_string() });
        }

        let decl = RE_ARRAY_SUFFIX.replace(&decl, "").trim().to_string();
        let unnamed = || Self { type_name: decl.clone(), name: String::new() };

        let Some(caps) = RE_TRAILING_IDENT.captures(&decl) else {
            return Some(unnamed());
        };
        let candidate = caps[1].to_string();
        let type_part = decl[..decl.len() - candidate.len()].trim();
        let core = type_core(type_part);

        if core.is_empty() || type_part.ends_with("::") || core.ends_with('<') || core.ends_with(',') {
            return Some(unnamed());
        }
        if BUILTIN_TYPES.contains(&candidate.as_str())
            && core.split_whitespace().all(|w| BUILTIN_TYPES.contains(&w))
        {
            return Some(unnamed());
        }

        Some(Self { type_name: type_part.to_string(), name: candidate })
    }
}

impl VariableDeclaration {
    /// Parses a variable head such as `static constexpr int kMax = 100`.
    pub fn parse(head: &str) -> Option<Self> {
        let text = strip_declaration_prefix(head);
        let first_word = text.split_whitespace().next()?;
        if STATEMENT_KEYWORDS.contains(&first_word) {
            return None;
        }

        let declarator = split_top_level(&text, '=').into_iter().next()?;
        let declarator = split_top_level(&declarator, ',').into_iter().next()?;
        let declarator = strip_bitfield(&declarator);
        let declarator = RE_ARRAY_SUFFIX.replace(declarator.trim(), "").trim().to_string();

        let (type_name, name) = if let Some(caps) = RE_FUNCTION_POINTER.captures(&declarator) {
            let start = caps.get(0)?.start();
            (declarator[..start].trim().to_string(), caps[1].to_string())
        } else {
            // direct initialization: `Widget w(3, "name")`
            let declarator = declarator.split('(').next().unwrap_or("").trim();
            let caps = RE_TRAILING_IDENT.captures(declarator)?;
            let name = caps[1].to_string();
            let type_part = declarator[..declarator.len() - name.len()].trim().to_string();
            (type_part, name)
        };

        if !RE_PREFIX.is_match(&type_name) || type_name.ends_with("::") {
            return None;
        }
        if type_core(&clean_type(&type_name)).is_empty() {
            return None;
        }
        if STATEMENT_KEYWORDS.contains(&name.as_str())
            || BUILTIN_TYPES.contains(&name.as_str())
            || TYPE_QUALIFIERS.contains(&name.as_str())
        {
            return None;
        }

        Some(Self {
            is_static: has_word(&type_name, "static"),
            is_constexpr: has_word(&type_name, "constexpr"),
            type_name: clean_type(&type_name),
            name,
        })
    }
}

/// Removes leading `template <...>` headers and attributes from a head.
pub fn strip_declaration_prefix(head: &str) -> String {
    let mut text = head.trim().to_string();
    loop {
        if let Some(m) = RE_ATTRIBUTE.find(&text) {
            text = text[m.end()..].to_string();
            continue;
        }
        if text.starts_with("template") {
            let rest = text["template".len()..].trim_start();
            if rest.starts_with('<') {
                if let Some(end) = matching_angle(rest) {
                    text = rest[end + 1..].trim_start().to_string();
                    continue;
                }
            }
        }
        break;
    }
    text
}

/// Splits `text` on `separator` occurrences outside of any bracket pair.
/// An `=` separator ignores comparison operators.
pub fn split_top_level(text: &str, separator: char) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for (idx, &c) in chars.iter().enumerate() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '>' if depth > 0 && chars.get(idx.wrapping_sub(1)) != Some(&'-') => depth -= 1,
            _ => {}
        }
        if c == separator && depth == 0 {
            if separator == '=' {
                let prev = if idx > 0 { chars[idx - 1] } else { ' ' };
                let next = chars.get(idx + 1).copied().unwrap_or(' ');
                if matches!(prev, '=' | '!' | '<' | '>') || next == '=' {
                    current.push(c);
                    continue;
                }
            }
            parts.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
    }
    parts.push(current);
    parts
}

/// Removes function/storage specifiers and attributes, collapsing whitespace.
pub fn clean_type(prefix: &str) -> String {
    let mut text = prefix.trim().to_string();
    while let Some(m) = RE_ATTRIBUTE.find(&text) {
        text = text[m.end()..].to_string();
    }
    collapse_whitespace(&RE_SPECIFIERS.replace_all(&text, " "))
}

pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn parse_parameters(list: &str) -> Vec<Parameter> {
    let trimmed = list.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Vec::new();
    }
    split_top_level(trimmed, ',')
        .iter()
        .filter_map(|raw| Parameter::parse(raw))
        .collect()
}

/// Finds the start of the declared name and the index of the `(` that opens
/// its parameter list.
fn locate_name(text: &str) -> Option<(usize, usize)> {
    if let Some(m) = RE_OPERATOR.find(text) {
        let after = m.end();
        let rest = &text[after..];
        let skipped = rest.len() - rest.trim_start().len();
        let open = if rest.trim_start().starts_with("()") {
            let from = after + skipped + 2;
            from + text[from..].find('(')?
        } else {
            after + rest.find('(')?
        };
        return Some((m.start(), open));
    }

    let bytes = text.as_bytes();
    let mut angle = 0i32;
    for (idx, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => angle += 1,
            b'>' if angle > 0 => angle -= 1,
            b'(' if angle == 0 => {
                let before = text[..idx].trim_end();
                let end = before.len();
                let start = before
                    .char_indices()
                    .rev()
                    .take_while(|&(_, c)| c.is_alphanumeric() || c == '_' || c == ':' || c == '~')
                    .last()
                    .map(|(i, _)| i)?;
                if start == end {
                    return None;
                }
                return Some((start, idx));
            }
            _ => {}
        }
    }
    None
}

fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, c) in text.char_indices().skip_while(|&(i, _)| i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn matching_angle(text: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_qualifier(full_name: &str, is_operator: bool) -> (Option<String>, String) {
    let split_at = if is_operator {
        full_name.find("operator").and_then(|pos| full_name[..pos].rfind("::"))
    } else {
        full_name.rfind("::")
    };
    match split_at {
        Some(pos) => {
            let qualifier = &full_name[..pos];
            let class = qualifier.rsplit("::").next().unwrap_or(qualifier);
            let class = class.split('<').next().unwrap_or(class);
            (Some(class.to_string()), full_name[pos + 2..].to_string())
        }
        None => (None, full_name.to_string()),
    }
}

fn strip_bitfield(declarator: &str) -> String {
    let chars: Vec<char> = declarator.chars().collect();
    for idx in 0..chars.len() {
        if chars[idx] == ':'
            && chars.get(idx + 1) != Some(&':')
            && (idx == 0 || chars[idx - 1] != ':')
        {
            return chars[..idx].iter().collect();
        }
    }
    declarator.to_string()
}

fn type_core(type_part: &str) -> String {
    let words: Vec<&str> = type_part
        .split(|c: char| c.is_whitespace() || c == '*' || c == '&')
        .filter(|w| !w.is_empty() && !TYPE_QUALIFIERS.contains(w))
        .collect();
    words.join(" ")
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|w| w == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(sig: &FunctionSignature) -> Vec<&str> {
        sig.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_parse_simple_function() {
        let sig = FunctionSignature::parse("int add(int a, int b)").unwrap();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.return_type, "int");
        assert_eq!(names(&sig), vec!["a", "b"]);
        assert!(!sig.is_noexcept);
        assert!(sig.qualifier.is_none());
    }

    #[test]
    fn test_parse_noexcept_and_const() {
        let sig = FunctionSignature::parse("bool hasSetting(const std::string& key) const noexcept").unwrap();
        assert!(sig.is_noexcept);
        assert!(sig.is_const);
        assert_eq!(names(&sig), vec!["key"]);
        assert_eq!(sig.return_type, "bool");
    }

    #[test]
    fn test_noexcept_false_still_throws() {
        let sig = FunctionSignature::parse("void run() noexcept(false)").unwrap();
        assert!(!sig.is_noexcept);
    }

    #[test]
    fn test_parse_specifiers_are_removed_from_return_type() {
        let sig = FunctionSignature::parse("static inline constexpr std::size_t capacity()").unwrap();
        assert_eq!(sig.return_type, "std::size_t");
        assert!(sig.is_static);
    }

    #[test]
    fn test_parse_out_of_line_method() {
        let sig = FunctionSignature::parse("std::string SettingsManager::getSetting(const std::string& key) const").unwrap();
        assert_eq!(sig.name, "getSetting");
        assert_eq!(sig.qualifier.as_deref(), Some("SettingsManager"));
    }

    #[test]
    fn test_parse_constructor_with_initializer_list() {
        let sig = FunctionSignature::parse("Widget::Widget(int size) : size_(size), name_").unwrap();
        assert_eq!(sig.name, "Widget");
        assert_eq!(sig.qualifier.as_deref(), Some("Widget"));
        assert_eq!(sig.return_type, "");
    }

    #[test]
    fn test_parse_operators() {
        let sig = FunctionSignature::parse("T& operator[](size_t index) noexcept").unwrap();
        assert_eq!(sig.name, "operator[]");
        assert_eq!(names(&sig), vec!["index"]);

        let call = FunctionSignature::parse("void operator()(int value) const").unwrap();
        assert_eq!(call.name, "operator()");
        assert_eq!(names(&call), vec!["value"]);

        let assign = FunctionSignature::parse("Foo& operator=(const Foo&) = delete").unwrap();
        assert_eq!(assign.name, "operator=");
        assert_eq!(assign.parameters.len(), 1);
        assert_eq!(assign.parameters[0].name, "");
        assert!(assign.is_operator());
    }

    #[test]
    fn test_identifiers_starting_with_operator_are_not_operators() {
        let sig = FunctionSignature::parse("int operatorCount() const").unwrap();
        assert_eq!(sig.name, "operatorCount");
        assert!(!sig.is_operator());
        assert_eq!(operator_symbol("operator_id"), None);
        assert_eq!(operator_symbol("operator+="), Some("+="));
        assert_eq!(operator_symbol("operator bool"), Some(" bool"));
    }

    #[test]
    fn test_parse_template_function() {
        let sig = FunctionSignature::parse("template <typename T> T clamp(T value, T low, T high)").unwrap();
        assert_eq!(sig.name, "clamp");
        assert_eq!(sig.return_type, "T");
        assert_eq!(names(&sig), vec!["value", "low", "high"]);
    }

    #[test]
    fn test_parse_trailing_return_type() {
        let sig = FunctionSignature::parse("auto size() const -> std::size_t").unwrap();
        assert_eq!(sig.return_type, "std::size_t");
    }

    #[test]
    fn test_parse_throw_spec() {
        let sig = FunctionSignature::parse("void open(const char* path) throw(IoError, FormatError)").unwrap();
        assert_eq!(
            sig.throw_spec,
            Some(vec!["IoError".to_string(), "FormatError".to_string()])
        );
        assert!(!sig.is_noexcept);

        let nothrow = FunctionSignature::parse("void close() throw()").unwrap();
        assert!(nothrow.is_noexcept);
    }

    #[test]
    fn test_rejects_non_functions() {
        assert!(FunctionSignature::parse("int x = compute(3)").is_none());
        assert!(FunctionSignature::parse("return foo(bar)").is_none());
        assert!(FunctionSignature::parse("if (ready)").is_none());
        assert!(FunctionSignature::parse("int count").is_none());
        assert!(FunctionSignature::parse("void (*callback)(int)").is_none());
    }

    #[test]
    fn test_constructor_call_detection() {
        let sig = FunctionSignature::parse("Widget w(3, \"name\")").unwrap();
        assert!(sig.looks_like_constructor_call());
        let decl = FunctionSignature::parse("Widget make(int size)").unwrap();
        assert!(!decl.looks_like_constructor_call());
    }

    #[test]
    fn test_parameter_naming_rules() {
        assert_eq!(Parameter::parse("const std::string& key").unwrap().name, "key");
        assert_eq!(Parameter::parse("int").unwrap().name, "");
        assert_eq!(Parameter::parse("unsigned int").unwrap().name, "");
        assert_eq!(Parameter::parse("const Foo&").unwrap().name, "");
        assert_eq!(Parameter::parse("std::string").unwrap().name, "");
        assert_eq!(Parameter::parse("int* values[4]").unwrap().name, "values");
        assert_eq!(Parameter::parse("T&& value").unwrap().name, "value");
        assert_eq!(Parameter::parse("int retries = 3").unwrap().name, "retries");
        assert_eq!(Parameter::parse("std::map<int, std::string> table").unwrap().name, "table");
        assert_eq!(Parameter::parse("void (*callback)(int)").unwrap().name, "callback");
        assert_eq!(Parameter::parse("...").unwrap().name, "...");
    }

    #[test]
    fn test_parse_variables() {
        let var = VariableDeclaration::parse("static constexpr int MAX_SETTINGS = 100").unwrap();
        assert_eq!(var.name, "MAX_SETTINGS");
        assert_eq!(var.type_name, "int");
        assert!(var.is_static);
        assert!(var.is_constexpr);

        assert_eq!(VariableDeclaration::parse("std::unique_ptr<Impl> pImpl").unwrap().name, "pImpl");
        assert_eq!(VariableDeclaration::parse("T data[N]").unwrap().name, "data");
        assert_eq!(VariableDeclaration::parse("unsigned flags : 3").unwrap().name, "flags");
        assert_eq!(VariableDeclaration::parse("void (*handler)(int)").unwrap().name, "handler");
        assert_eq!(VariableDeclaration::parse("int a, b").unwrap().name, "a");
        assert_eq!(VariableDeclaration::parse("Widget w(3, \"name\")").unwrap().name, "w");
    }

    #[test]
    fn test_rejects_non_variables() {
        assert!(VariableDeclaration::parse("return value").is_none());
        assert!(VariableDeclaration::parse("count").is_none());
        assert!(VariableDeclaration::parse("BOOST_AUTO_TEST_SUITE_END()").is_none());
        assert!(VariableDeclaration::parse("unsigned int").is_none());
    }

    #[test]
    fn test_strip_declaration_prefix() {
        assert_eq!(
            strip_declaration_prefix("template <typename T, size_t N> [[nodiscard]] T get()"),
            "T get()"
        );
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        let parts = split_top_level("std::map<int, int> m, std::function<void(int, int)> f", ',');
        assert_eq!(parts.len(), 2);
        let eq = split_top_level("bool same = a == b", '=');
        assert_eq!(eq.len(), 2);
        assert_eq!(eq[1].trim(), "a == b");
    }
}
