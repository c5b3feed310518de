//! Non-destructive merging of comment blocks into source text.
//!
//! The engine never edits a line it did not plan to edit: every change is an
//! insertion directly above a unit or, in enhance mode, the replacement of
//! exactly the lines of an existing Doxygen block. Edits are applied from the
//! bottom of the file upward so that earlier line numbers stay valid.

use crate::error::Error;
use crate::parser::{SourceUnit, UnitKind};
use crate::synthesizer::CommentBlock;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Lines of unchanged context around each diff hunk.
const DIFF_CONTEXT: usize = 3;

/// What to do with units that already carry a Doxygen block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteMode {
    /// Leave existing blocks untouched
    #[default]
    SkipExisting,
    /// Replace existing blocks with freshly synthesized ones
    EnhanceExisting,
}

impl FromStr for RewriteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip-existing" | "skip" => Ok(RewriteMode::SkipExisting),
            "enhance-existing" | "enhance" => Ok(RewriteMode::EnhanceExisting),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteMode::SkipExisting => write!(f, "skip-existing"),
            RewriteMode::EnhanceExisting => write!(f, "enhance-existing"),
        }
    }
}

/// One planned change, in original line coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    /// First original line affected (the insertion point for insertions)
    pub line: usize,
    /// Number of original lines replaced; zero for insertions
    pub removed: usize,
    #[serde(skip)]
    pub added: Vec<String>,
    pub unit: String,
}

impl Edit {
    pub fn is_insertion(&self) -> bool {
        self.removed == 0
    }
}

/// Outcome of one rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub text: String,
    /// Edits in ascending line order
    pub edits: Vec<Edit>,
    pub inserted: usize,
    pub replaced: usize,
    /// Units left alone because they already had a comment or could not be anchored
    pub skipped: usize,
    original: Vec<String>,
}

impl RewriteResult {
    pub fn is_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Renders the edits as a unified diff against the original text.
    ///
    /// Returns an empty string when nothing changed.
    pub fn diff(&self, label: &str) -> String {
        if self.edits.is_empty() {
            return String::new();
        }

        let mut out = format!("--- a/{}\n+++ b/{}\n", label, label);
        let mut offset: isize = 0;

        for group in self.hunk_groups() {
            let first = &group[0];
            let last = &group[group.len() - 1];
            let old_start = first.line.saturating_sub(DIFF_CONTEXT);
            let old_end = (last.line + last.removed + DIFF_CONTEXT).min(self.original.len());

            let mut body = Vec::new();
            let mut old_count = 0;
            let mut new_count = 0;
            let mut pos = old_start;
            let mut pending = group.iter().peekable();

            while pos < old_end || pending.peek().is_some() {
                if let Some(edit) = pending.next_if(|e| e.line == pos) {
                    for line in &self.original[pos..pos + edit.removed] {
                        body.push(format!("-{}", line));
                    }
                    for line in &edit.added {
                        body.push(format!("+{}", line));
                    }
                    old_count += edit.removed;
                    new_count += edit.added.len();
                    pos += edit.removed;
                    continue;
                }
                if pos >= old_end {
                    break;
                }
                body.push(format!(" {}", self.original[pos]));
                old_count += 1;
                new_count += 1;
                pos += 1;
            }

            let new_start = (old_start as isize + offset).max(0) as usize;
            out.push_str(&format!(
                "@@ -{} +{} @@\n",
                hunk_range(old_start, old_count),
                hunk_range(new_start, new_count)
            ));
            for line in body {
                out.push_str(&line);
                out.push('\n');
            }
            offset += new_count as isize - old_count as isize;
        }
        out
    }

    /// Groups edits whose context windows touch into shared hunks.
    fn hunk_groups(&self) -> Vec<Vec<&Edit>> {
        let mut groups: Vec<Vec<&Edit>> = Vec::new();
        for edit in &self.edits {
            match groups.last_mut() {
                Some(group)
                    if group
                        .last()
                        .is_some_and(|prev| edit.line <= prev.line + prev.removed + 2 * DIFF_CONTEXT) =>
                {
                    group.push(edit)
                }
                _ => groups.push(vec![edit]),
            }
        }
        groups
    }
}

fn hunk_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, count),
    }
}

/// Merges synthesized comment blocks into source text.
pub struct RewriteEngine {
    mode: RewriteMode,
}

impl RewriteEngine {
    pub fn new(mode: RewriteMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    /// Applies the comment blocks to `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - The original file contents
    /// * `units` - All units scanned from `text`, in file order
    /// * `comments` - Pairs of unit index and the block synthesized for it
    ///
    /// # Returns
    ///
    /// Returns a `RewriteResult` whose text differs from `text` only by the
    /// inserted or replaced comment lines. Line endings follow the input.
    pub fn rewrite(
        &self,
        text: &str,
        units: &[SourceUnit],
        comments: &[(usize, CommentBlock)],
    ) -> RewriteResult {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let lines: Vec<&str> = text.split_inclusive('\n').collect();

        let mut edits: Vec<Edit> = Vec::new();
        let mut inserted = 0;
        let mut replaced = 0;
        let mut skipped = 0;

        for (idx, block) in comments {
            let Some(unit) = units.get(*idx) else {
                continue;
            };
            if !unit.kind.is_documentable() {
                continue;
            }

            let (line, removed) = match (unit.existing_comment, self.mode) {
                (Some(_), RewriteMode::SkipExisting) => {
                    skipped += 1;
                    continue;
                }
                (Some(range), RewriteMode::EnhanceExisting) => (range.start, range.len()),
                (None, _) => (unit.start_line, 0),
            };

            if !Self::is_anchored(units, *idx, line) {
                debug!(
                    "Skipping {} '{}': it shares a line with its access specifier",
                    unit.kind.label(),
                    unit.name
                );
                skipped += 1;
                continue;
            }
            if line > lines.len() || edits.iter().any(|e| e.line == line) {
                skipped += 1;
                continue;
            }

            if removed == 0 {
                inserted += 1;
            } else {
                replaced += 1;
            }
            edits.push(Edit {
                line,
                removed,
                added: block.lines().to_vec(),
                unit: unit.name.clone(),
            });
        }

        edits.sort_by_key(|e| e.line);

        let mut output: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        for edit in edits.iter().rev() {
            let replacement = edit.added.iter().map(|l| format!("{}{}", l, newline));
            output.splice(edit.line..edit.line + edit.removed, replacement);
        }

        debug!(
            "Rewrite ({}): {} inserted, {} replaced, {} skipped",
            self.mode, inserted, replaced, skipped
        );

        RewriteResult {
            text: output.concat(),
            edits,
            inserted,
            replaced,
            skipped,
            original: lines
                .iter()
                .map(|l| l.trim_end_matches(['\r', '\n']).to_string())
                .collect(),
        }
    }

    /// A unit directly following an access specifier may only be commented
    /// when the insertion point lies after the specifier's line.
    fn is_anchored(units: &[SourceUnit], idx: usize, insert_at: usize) -> bool {
        match idx.checked_sub(1).and_then(|prev| units.get(prev)) {
            Some(marker) if marker.kind == UnitKind::AccessSpecifier => insert_at > marker.start_line,
            _ => true,
        }
    }
}
