//! Heuristic declaration scanner for C++ text.
//!
//! The scanner walks the text once, line by line, keeping a brace-depth counter
//! and a stack of enclosing scopes (namespaces, classes, linkage blocks). It
//! recognizes declaration heads with lightweight pattern matching instead of a
//! grammar and records, for every unit, its exact line range and any Doxygen
//! block sitting directly above it.
//!
//! Lines the scanner does not understand are skipped. A missed declaration only
//! means no comment is generated for it; it never corrupts the unit list.

use crate::signature::{FunctionSignature, VariableDeclaration};
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_ACCESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(public|protected|private)(?:\s+[A-Za-z_]\w*)?\s*:(?:[^:]|$)").unwrap()
});

static RE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*\s*:$").unwrap());

static RE_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:inline\s+)?namespace\b\s*([\w:]*)").unwrap());

static RE_LINKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^extern\s+"C(?:\+\+)?"\s*"#).unwrap());

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(class|struct|union)\b\s*(.*)$").unwrap());

static RE_ENUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^enum\b(?:\s+(?:class|struct)\b)?\s*(?:\[\[[^\]]*\]\]\s*)?([A-Za-z_]\w*)?\s*(?::\s*[\w:\s]+)?$")
        .unwrap()
});

static RE_MACRO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

static RE_MACRO_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*\s*(?:\(.*\))?$").unwrap());

static RE_DOC_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[@\\][A-Za-z]+").unwrap());

/// Braced macros whose bodies hold further declarations, like doctest suites.
const SCOPE_MACROS: &[&str] = &["TEST_SUITE", "DOCTEST_TEST_SUITE"];

/// Statements are joined over at most this many lines before giving up.
const MAX_STATEMENT_LINES: usize = 24;

/// Leading words of statements that never declare a documentable unit.
const SKIPPED_KEYWORDS: &[&str] = &[
    "typedef", "using", "friend", "static_assert", "return", "if", "else", "for", "while",
    "do", "switch", "case", "goto", "throw", "delete", "new", "try", "catch", "asm",
    "co_return", "co_yield",
];

/// Kind of a recognized structural unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitKind {
    Namespace,
    Class,
    Struct,
    Enum,
    Function,
    Method,
    Variable,
    AccessSpecifier,
    /// An upper-case macro with a braced body, such as `TEST(Suite, Name) { ... }`
    MacroInvocation,
}

impl UnitKind {
    /// Whether the rewrite engine should attach a comment to units of this kind.
    /// Namespaces and access specifiers are structural anchors only.
    pub fn is_documentable(self) -> bool {
        !matches!(self, UnitKind::Namespace | UnitKind::AccessSpecifier)
    }

    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Namespace => "namespace",
            UnitKind::Class => "class",
            UnitKind::Struct => "struct",
            UnitKind::Enum => "enum",
            UnitKind::Function => "function",
            UnitKind::Method => "method",
            UnitKind::Variable => "variable",
            UnitKind::AccessSpecifier => "access specifier",
            UnitKind::MacroInvocation => "macro",
        }
    }
}

/// Inclusive, zero-based range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// One recognized structural element of a C++ file.
///
/// Line numbers are zero-based indices into the original text's lines and are
/// authoritative: later stages attach metadata to a unit but never move it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    pub kind: UnitKind,
    pub name: String,
    /// Raw declaration head, joined onto one line, without the `{` or `;`
    pub signature: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Literal whitespace prefix of the unit's first line
    pub indent: String,
    /// Doxygen block directly above the unit, if any
    pub existing_comment: Option<LineRange>,
    /// Name of the class this unit is a member of
    pub enclosing_class: Option<String>,
}

/// Scanner entry point.
///
/// # Example
///
/// ```
/// use doxygen_from_source::parser::{DeclarationScanner, UnitKind};
///
/// let units = DeclarationScanner::scan("int add(int a, int b);\n");
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].kind, UnitKind::Function);
/// assert_eq!(units[0].name, "add");
/// ```
pub struct DeclarationScanner;

impl DeclarationScanner {
    /// Partitions `text` into an ordered list of declaration units.
    pub fn scan(text: &str) -> Vec<SourceUnit> {
        let lines: Vec<&str> = text.lines().collect();
        let mut state = ScanState::new(&lines);
        state.run();
        debug!("Scanned {} lines into {} units", lines.len(), state.units.len());
        state.units
    }
}

/// Counts braces on a line, ignoring string and character literals and comments.
/// Block-comment state carries over between lines.
#[derive(Debug, Default)]
pub(crate) struct BraceCounter {
    in_block_comment: bool,
}

impl BraceCounter {
    pub(crate) fn delta(&mut self, line: &str) -> i32 {
        self.count(line).0
    }

    /// Returns the net brace delta of a line and whether it opened any brace.
    pub(crate) fn count(&mut self, line: &str) -> (i32, bool) {
        let chars: Vec<char> = line.chars().collect();
        let mut delta = 0;
        let mut opened = false;
        let mut quote: Option<char> = None;
        let mut idx = 0;

        while idx < chars.len() {
            let c = chars[idx];
            let next = chars.get(idx + 1).copied();

            if self.in_block_comment {
                if c == '*' && next == Some('/') {
                    self.in_block_comment = false;
                    idx += 2;
                } else {
                    idx += 1;
                }
                continue;
            }

            if let Some(q) = quote {
                if c == '\\' {
                    idx += 2;
                    continue;
                }
                if c == q {
                    quote = None;
                }
                idx += 1;
                continue;
            }

            match c {
                '/' if next == Some('/') => break,
                '/' if next == Some('*') => {
                    self.in_block_comment = true;
                    idx += 2;
                    continue;
                }
                '"' => quote = Some('"'),
                // digit separators: 1'000'000
                '\'' if idx > 0 && chars[idx - 1].is_ascii_alphanumeric() => {}
                '\'' => quote = Some('\''),
                '{' => {
                    delta += 1;
                    opened = true;
                }
                '}' => delta -= 1,
                _ => {}
            }
            idx += 1;
        }
        (delta, opened)
    }

    pub(crate) fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }
}

/// Returns the literal whitespace prefix of a line.
pub fn leading_indent(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Finds the line that closes the brace block opened at or after `start`,
/// returning `(open_line, close_line)`. Unterminated blocks end at the last line.
pub(crate) fn find_block(lines: &[&str], start: usize) -> Option<(usize, usize)> {
    let mut counter = BraceCounter::default();
    let mut depth = 0;
    let mut open = None;

    for (idx, line) in lines.iter().enumerate().skip(start) {
        let (delta, opened) = counter.count(line);
        let Some(open_line) = open else {
            // closing braces before the block opens belong to the outer scope
            if opened {
                open = Some(idx);
                depth = delta;
                if depth <= 0 {
                    return Some((idx, idx));
                }
            }
            continue;
        };
        depth += delta;
        if depth <= 0 {
            return Some((open_line, idx));
        }
    }
    open.map(|o| (o, lines.len().saturating_sub(1)))
}

/// Removes `//` and `/* */` comments from a single line, keeping literals.
fn strip_comments(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut idx = 0;

    while idx < chars.len() {
        let c = chars[idx];
        let next = chars.get(idx + 1).copied();
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(n) = next {
                    out.push(n);
                }
                idx += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            idx += 1;
            continue;
        }
        match c {
            '/' if next == Some('/') => break,
            '/' if next == Some('*') => {
                let close = (idx + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/');
                match close {
                    Some(j) => {
                        idx = j + 2;
                        out.push(' ');
                        continue;
                    }
                    None => break,
                }
            }
            '"' => quote = Some('"'),
            '\'' if idx > 0 && chars[idx - 1].is_ascii_alphanumeric() => {}
            '\'' => quote = Some('\''),
            _ => {}
        }
        out.push(c);
        idx += 1;
    }
    out
}

/// Position of the first `{` or `;` outside parentheses and literals.
fn find_terminator(text: &str) -> Option<(usize, Terminator)> {
    let mut paren = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = ' ';

    for (idx, c) in text.char_indices() {
        let before = std::mem::replace(&mut prev, c);
        if let Some(q) = quote {
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
            '"' => quote = Some('"'),
            '\'' if !before.is_ascii_alphanumeric() => quote = Some('\''),
            '(' | '[' => paren += 1,
            ')' | ']' => paren -= 1,
            '{' if paren <= 0 => return Some((idx, Terminator::Brace)),
            ';' if paren <= 0 => return Some((idx, Terminator::Semicolon)),
            _ => {}
        }
    }
    None
}

/// Walks upward from `start` over blank lines looking for a Doxygen block.
///
/// Only a `/**`/`/*!` block or a `///`/`//!` run whose first content line
/// starts with a `@tag` or `\tag` marker qualifies. Anything else is ordinary
/// text.
pub fn find_existing_comment(lines: &[&str], start: usize) -> Option<LineRange> {
    let mut j = start;
    while j > 0 {
        j -= 1;
        let trimmed = lines[j].trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.ends_with("*/") {
            let end = j;
            let mut k = j;
            loop {
                let t = lines[k].trim_start();
                if t.starts_with("/*") {
                    break;
                }
                if t.contains("/*") || (k != end && t.contains("*/")) || k == 0 {
                    return None;
                }
                k -= 1;
            }
            let opener = lines[k].trim_start();
            let is_doxygen = (opener.starts_with("/**") && !opener.starts_with("/**/"))
                || opener.starts_with("/*!");
            if !is_doxygen {
                return None;
            }
            return block_starts_with_tag(&lines[k..=end]).then(|| LineRange::new(k, end));
        }

        if is_doc_line(trimmed) {
            let end = j;
            let mut k = j;
            while k > 0 && is_doc_line(lines[k - 1].trim()) {
                k -= 1;
            }
            let first = lines[k].trim()[3..].trim_start();
            return RE_DOC_TAG.is_match(first).then(|| LineRange::new(k, end));
        }

        return None;
    }
    None
}

fn is_doc_line(trimmed: &str) -> bool {
    (trimmed.starts_with("///") && !trimmed.starts_with("////") && !trimmed.starts_with("///<"))
        || (trimmed.starts_with("//!") && !trimmed.starts_with("//!<"))
}

fn block_starts_with_tag(block: &[&str]) -> bool {
    for (idx, line) in block.iter().enumerate() {
        let mut content = line.trim();
        if idx == 0 {
            content = &content[3..];
        }
        let content = content.trim_end_matches("*/").trim();
        let content = if content.starts_with("*/") {
            ""
        } else {
            content.trim_start_matches('*').trim()
        };
        if !content.is_empty() {
            return RE_DOC_TAG.is_match(content);
        }
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Brace,
    Semicolon,
}

struct Statement {
    head: String,
    terminator: Terminator,
    end: usize,
}

#[derive(Debug)]
enum ScopeKind {
    Namespace,
    Class(String),
    Linkage,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    open_depth: i32,
    unit: Option<usize>,
}

/// Outcome of classifying one declaration head.
#[derive(Debug)]
enum Declaration {
    Namespace(String),
    Linkage,
    Class { kind: UnitKind, name: String },
    Enum(String),
    Function { kind: UnitKind, name: String, enclosing: Option<String> },
    Macro(String),
    Variable(String),
    /// Understood, but not documented; a braced body is skipped
    Ignored,
}

struct ScanState<'a> {
    lines: &'a [&'a str],
    units: Vec<SourceUnit>,
    scopes: Vec<Scope>,
    depth: i32,
    braces: BraceCounter,
}

impl<'a> ScanState<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            units: Vec::new(),
            scopes: Vec::new(),
            depth: 0,
            braces: BraceCounter::default(),
        }
    }

    fn run(&mut self) {
        let mut i = 0;
        while i < self.lines.len() {
            i = self.step(i);
        }
        let last = self.lines.len().saturating_sub(1);
        while let Some(scope) = self.scopes.pop() {
            if let Some(idx) = scope.unit {
                self.units[idx].end_line = last;
            }
        }
    }

    /// Processes the statement starting at line `i` and returns the next line.
    fn step(&mut self, i: usize) -> usize {
        let trimmed = self.lines[i].trim();

        if self.braces.in_block_comment()
            || trimmed.starts_with("/*")
            || trimmed.starts_with("//")
        {
            self.advance(i, i);
            return i + 1;
        }
        if trimmed.is_empty() {
            return i + 1;
        }
        if trimmed.starts_with('#') {
            let mut j = i;
            while self.lines[j].trim_end().ends_with('\\') && j + 1 < self.lines.len() {
                j += 1;
            }
            return j + 1;
        }
        if let Some(caps) = RE_ACCESS.captures(trimmed) {
            let name = caps[1].to_string();
            self.push_unit(UnitKind::AccessSpecifier, name, trimmed.to_string(), i, i, None);
            self.advance(i, i);
            return i + 1;
        }
        if RE_LABEL.is_match(trimmed) || trimmed.starts_with('}') || trimmed.starts_with('{') {
            self.advance(i, i);
            return i + 1;
        }

        let Some(stmt) = self.collect_statement(i) else {
            self.advance(i, i);
            return i + 1;
        };

        match self.classify(&stmt) {
            Some(decl) => self.apply(i, stmt, decl),
            // an unrecognized head still owns its body
            None if stmt.terminator == Terminator::Brace => self.skip_block(i, stmt.end) + 1,
            None => {
                self.advance(i, i);
                i + 1
            }
        }
    }

    /// Joins lines from `i` until the first `{` or `;` outside parentheses.
    fn collect_statement(&self, i: usize) -> Option<Statement> {
        let mut joined = String::new();
        let limit = (i + MAX_STATEMENT_LINES).min(self.lines.len());

        for j in i..limit {
            let trimmed = self.lines[j].trim();
            if j > i {
                if trimmed.is_empty()
                    || trimmed.starts_with('#')
                    || trimmed.starts_with('}')
                    || RE_ACCESS.is_match(trimmed)
                {
                    return None;
                }
                if trimmed.starts_with("//") {
                    continue;
                }
                if trimmed.starts_with("/*") && !trimmed.contains("*/") {
                    return None;
                }
                // A bare macro line only joins with a body that follows it
                if RE_MACRO_LINE.is_match(joined.trim()) && !trimmed.starts_with('{') {
                    return None;
                }
            }

            let code = strip_comments(trimmed);
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(code.trim());

            if let Some((pos, terminator)) = find_terminator(&joined) {
                return Some(Statement {
                    head: joined[..pos].trim().to_string(),
                    terminator,
                    end: j,
                });
            }
        }
        None
    }

    fn current_class(&self) -> Option<&str> {
        self.scopes.iter().rev().find_map(|scope| match &scope.kind {
            ScopeKind::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn in_class_scope(&self) -> bool {
        matches!(self.scopes.last(), Some(Scope { kind: ScopeKind::Class(_), .. }))
    }

    fn classify(&self, stmt: &Statement) -> Option<Declaration> {
        let head = crate::signature::strip_declaration_prefix(&stmt.head);
        let braced = stmt.terminator == Terminator::Brace;

        let first_word = head
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .unwrap_or("");
        if SKIPPED_KEYWORDS.contains(&first_word) && !(first_word == "friend" && head.contains('(')) {
            return Some(Declaration::Ignored);
        }
        if head.is_empty() {
            return braced.then_some(Declaration::Ignored);
        }

        if let Some(caps) = RE_NAMESPACE.captures(&head) {
            if braced {
                let name = caps.get(1).map_or("", |m| m.as_str());
                let name = if name.is_empty() { "(anonymous)" } else { name };
                return Some(Declaration::Namespace(name.to_string()));
            }
            return Some(Declaration::Ignored);
        }

        if let Some(m) = RE_LINKAGE.find(&head) {
            if braced && head[m.end()..].trim().is_empty() {
                return Some(Declaration::Linkage);
            }
            let rest = head[m.end()..].to_string();
            return self.classify(&Statement { head: rest, terminator: stmt.terminator, end: stmt.end });
        }

        if let Some(caps) = RE_CLASS.captures(&head) {
            let rest = caps[2].to_string();
            if !rest.contains('=') && !rest.contains('(') {
                if braced {
                    let kind = if &caps[1] == "class" { UnitKind::Class } else { UnitKind::Struct };
                    return Some(match class_name(&rest) {
                        Some(name) => Declaration::Class { kind, name },
                        None => Declaration::Ignored,
                    });
                }
                return Some(Declaration::Ignored);
            }
        }

        if head.starts_with("enum") {
            if let Some(caps) = RE_ENUM.captures(&head) {
                return Some(match (braced, caps.get(1)) {
                    (true, Some(name)) => Declaration::Enum(name.as_str().to_string()),
                    _ => Declaration::Ignored,
                });
            }
        }

        if let Some(sig) = FunctionSignature::parse(&head) {
            if let Some(decl) = self.classify_function(&sig, braced) {
                return Some(decl);
            }
        }

        if !head.contains('(') || !braced {
            if let Some(var) = VariableDeclaration::parse(&head) {
                return Some(Declaration::Variable(var.name));
            }
        }
        None
    }

    fn classify_function(
        &self,
        sig: &FunctionSignature,
        braced: bool,
    ) -> Option<Declaration> {
        let prefix_empty = sig.return_type.is_empty();

        if prefix_empty && sig.qualifier.is_none() && RE_MACRO_NAME.is_match(&sig.name) {
            if !braced {
                return Some(Declaration::Ignored);
            }
            if SCOPE_MACROS.contains(&sig.name.as_str()) {
                return Some(Declaration::Linkage);
            }
            return Some(Declaration::Macro(sig.name.clone()));
        }

        if !braced && sig.looks_like_constructor_call() {
            return None;
        }

        let class = self.current_class();
        let member_of_class = self.in_class_scope();

        if prefix_empty && !sig.is_operator() {
            let is_special = match (sig.qualifier.as_deref(), class) {
                (Some(_), _) => true,
                (None, Some(class)) if member_of_class => {
                    sig.name == class || sig.name == format!("~{}", class)
                }
                _ => sig.name.starts_with('~'),
            };
            if !is_special {
                return None;
            }
        }

        let (kind, enclosing) = match (&sig.qualifier, member_of_class) {
            (_, true) => (UnitKind::Method, class.map(str::to_string)),
            (Some(qualifier), false) => (UnitKind::Method, Some(qualifier.clone())),
            (None, false) => (UnitKind::Function, None),
        };
        let name = match &sig.qualifier {
            Some(q) if !member_of_class => format!("{}::{}", q, sig.name),
            _ => sig.name.clone(),
        };
        Some(Declaration::Function { kind, name, enclosing })
    }

    fn apply(&mut self, i: usize, stmt: Statement, decl: Declaration) -> usize {
        let braced = stmt.terminator == Terminator::Brace;
        let class = if self.in_class_scope() { self.current_class().map(str::to_string) } else { None };

        match decl {
            Declaration::Namespace(name) => {
                let idx = self.push_unit(UnitKind::Namespace, name, stmt.head, i, stmt.end, None);
                self.open_scope(i, stmt.end, ScopeKind::Namespace, Some(idx));
                stmt.end + 1
            }
            Declaration::Linkage => {
                self.open_scope(i, stmt.end, ScopeKind::Linkage, None);
                stmt.end + 1
            }
            Declaration::Class { kind, name } => {
                let idx = self.push_unit(kind, name.clone(), stmt.head, i, stmt.end, class);
                self.open_scope(i, stmt.end, ScopeKind::Class(name), Some(idx));
                stmt.end + 1
            }
            Declaration::Enum(name) => {
                let idx = self.push_unit(UnitKind::Enum, name, stmt.head, i, stmt.end, class);
                let end = self.skip_block(i, stmt.end);
                self.units[idx].end_line = end;
                end + 1
            }
            Declaration::Function { kind, name, enclosing } => {
                let idx = self.push_unit(kind, name, stmt.head, i, stmt.end, enclosing);
                let end = if braced { self.skip_block(i, stmt.end) } else { self.advance(i, stmt.end) };
                self.units[idx].end_line = end;
                end + 1
            }
            Declaration::Macro(name) => {
                let idx = self.push_unit(UnitKind::MacroInvocation, name, stmt.head, i, stmt.end, class);
                let end = self.skip_block(i, stmt.end);
                self.units[idx].end_line = end;
                end + 1
            }
            Declaration::Variable(name) => {
                let idx = self.push_unit(UnitKind::Variable, name, stmt.head, i, stmt.end, class);
                let end = if braced { self.skip_block(i, stmt.end) } else { self.advance(i, stmt.end) };
                self.units[idx].end_line = end;
                end + 1
            }
            Declaration::Ignored => {
                let end = if braced { self.skip_block(i, stmt.end) } else { self.advance(i, stmt.end) };
                end + 1
            }
        }
    }

    fn push_unit(
        &mut self,
        kind: UnitKind,
        name: String,
        signature: String,
        start: usize,
        end: usize,
        enclosing_class: Option<String>,
    ) -> usize {
        let existing_comment = if kind.is_documentable() {
            find_existing_comment(self.lines, start)
        } else {
            None
        };
        debug!("Line {}: {} '{}'", start + 1, kind.label(), name);
        self.units.push(SourceUnit {
            kind,
            name,
            signature,
            start_line: start,
            end_line: end,
            indent: leading_indent(self.lines[start]).to_string(),
            existing_comment,
            enclosing_class,
        });
        self.units.len() - 1
    }

    fn open_scope(&mut self, start: usize, end: usize, kind: ScopeKind, unit: Option<usize>) {
        self.scopes.push(Scope { kind, open_depth: self.depth, unit });
        self.advance(start, end);
    }

    /// Counts braces on lines `start..=end` and closes finished scopes.
    fn advance(&mut self, start: usize, end: usize) -> usize {
        for line in &self.lines[start..=end] {
            self.depth += self.braces.delta(line);
        }
        self.close_scopes(end);
        end
    }

    /// Consumes a braced body whose opening brace lies within `start..=end`,
    /// returning the line that closes it.
    fn skip_block(&mut self, start: usize, end: usize) -> usize {
        let base = self.depth;
        let mut j = start;
        loop {
            self.depth += self.braces.delta(self.lines[j]);
            if j >= end && self.depth <= base {
                break;
            }
            if j + 1 >= self.lines.len() {
                break;
            }
            j += 1;
        }
        self.close_scopes(j);
        j
    }

    fn close_scopes(&mut self, line: usize) {
        while let Some(scope) = self.scopes.last() {
            if scope.open_depth < self.depth {
                break;
            }
            if let Some(scope) = self.scopes.pop() {
                if let Some(idx) = scope.unit {
                    self.units[idx].end_line = line;
                }
            }
        }
    }
}

/// Extracts the declared name from the text after `class`/`struct`/`union`.
fn class_name(rest: &str) -> Option<String> {
    // cut the base clause at the first single ':'
    let chars: Vec<char> = rest.trim().chars().collect();
    let mut cut = chars.len();
    for idx in 0..chars.len() {
        if chars[idx] == ':'
            && chars.get(idx + 1) != Some(&':')
            && (idx == 0 || chars[idx - 1] != ':')
        {
            cut = idx;
            break;
        }
    }
    let head: String = chars[..cut].iter().collect();
    let head = head.split('<').next().unwrap_or("").trim();

    head.split_whitespace()
        .filter(|w| *w != "final" && !w.starts_with("[["))
        .last()
        .map(|w| w.rsplit("::").next().unwrap_or(w).to_string())
        .filter(|w| w.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_'))
}
