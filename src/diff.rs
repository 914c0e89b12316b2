// SPDX-License-Identifier: MIT

//! Edit scripts ("diffs") between two texts, and the passes that turn a raw,
//! possibly redundant edit script into a minimal and readable one.
//!
//! A diff is an ordered sequence of [`Diff`] records, each tagging a span of
//! text as kept ([`Operation::Equal`]), removed ([`Operation::Delete`]) or
//! added ([`Operation::Insert`]). Concatenating the equal and deleted spans
//! yields the source text; concatenating the equal and inserted spans yields
//! the destination text. None of the passes in this module change either
//! projection, only how it is represented.
//!
//! Texts are sequences of `char`. Most of the machinery is generic over the
//! element type so that it applies unchanged to line-encoded texts (see
//! [`lines_to_chars`]), whose elements are [`LineId`]s.

use std::fmt;

use itertools::Itertools;

use crate::utils::*;

mod cleanup;
mod common;
mod half_match;
mod lines;
mod lossless;

pub use cleanup::{cleanup_efficiency, cleanup_merge, cleanup_semantic};
pub use common::{common_overlap, common_prefix, common_suffix};
pub use half_match::{half_match, HalfMatch};
pub use lines::{chars_to_lines, lines_to_chars, rehydrate, EncodedLines, LineId};
pub use lossless::cleanup_semantic_lossless;

/// The edit cost used by [`cleanup_efficiency`] unless configured otherwise.
pub const DEFAULT_EDIT_COST: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Delete,
    Equal,
    Insert,
}
impl TryFrom<i8> for Operation {
    type Error = Box<dyn std::error::Error>;

    /// Convert the conventional integer tags (-1, 0, 1).
    fn try_from(tag: i8) -> Result<Self> {
        match tag {
            -1 => Ok(Operation::Delete),
            0 => Ok(Operation::Equal),
            1 => Ok(Operation::Insert),
            _ => Err(format!("invalid diff operation: {}", tag))?,
        }
    }
}
impl From<Operation> for i8 {
    fn from(op: Operation) -> i8 {
        match op {
        Operation::Delete => -1,
        Operation::Equal => 0,
        Operation::Insert => 1,
        }
    }
}

/// A single edit operation on a span of text.
///
/// Diffs are values: the cleanup passes never modify a record in place but
/// replace it with a freshly built one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Diff<T = char> {
    op: Operation,
    text: Vec<T>,
}
impl<T> Diff<T> {
    pub fn new(op: Operation, text: Vec<T>) -> Self {
        Self { op, text }
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn text(&self) -> &[T] {
        &self.text
    }

    pub fn into_text(self) -> Vec<T> {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
impl Diff<char> {
    pub fn equal(text: &str) -> Self {
        Self::new(Operation::Equal, text.chars().collect())
    }

    pub fn delete(text: &str) -> Self {
        Self::new(Operation::Delete, text.chars().collect())
    }

    pub fn insert(text: &str) -> Self {
        Self::new(Operation::Insert, text.chars().collect())
    }

    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }
}
impl fmt::Debug for Diff<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.op, self.text_string())
    }
}
impl fmt::Debug for Diff<LineId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.op, self.text)
    }
}
impl fmt::Display for Diff<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text_string())
    }
}

/// A diff over line ids, as produced when diffing line-encoded texts.
pub type HashedDiff = Diff<LineId>;

/// Reconstruct the source text: all equal and deleted spans, in order.
pub fn source_text(diffs: &[Diff]) -> String {
    diffs.iter()
        .filter(|diff| diff.op != Operation::Insert)
        .flat_map(|diff| diff.text.iter())
        .collect()
}

/// Reconstruct the destination text: all equal and inserted spans, in order.
pub fn destination_text(diffs: &[Diff]) -> String {
    diffs.iter()
        .filter(|diff| diff.op != Operation::Delete)
        .flat_map(|diff| diff.text.iter())
        .collect()
}

/// Translate a location in the source text into the equivalent location in
/// the destination text.
///
/// A location that falls inside a deleted span maps to the position where
/// the deletion happened.
pub fn x_index<T>(diffs: &[Diff<T>], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut hit = None;

    for diff in diffs {
        if diff.op != Operation::Insert {
            chars1 += diff.len();
        }
        if diff.op != Operation::Delete {
            chars2 += diff.len();
        }
        if chars1 > loc {
            hit = Some(diff.op);
            break
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }

    if hit == Some(Operation::Delete) {
        return last_chars2
    }
    last_chars2 + (loc - last_chars1)
}

/// Whether the diff is in the canonical form produced by [`cleanup_merge`]:
/// no empty spans and no two neighbours with the same operation.
pub fn is_normalized<T>(diffs: &[Diff<T>]) -> bool {
    diffs.iter().all(|diff| !diff.is_empty()) &&
    diffs.iter().tuple_windows().all(|(a, b)| a.op != b.op)
}

/// Which cleanup to apply to a freshly computed diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupMode {
    /// Leave the diff exactly as produced.
    None,

    /// Only merge and canonicalize, see [`cleanup_merge`].
    Merge,

    /// Align edits to natural text boundaries without changing the set of
    /// edited characters, see [`cleanup_semantic_lossless`].
    SemanticLossless,

    /// Trade minimality for readability, see [`cleanup_semantic`].
    Semantic,

    /// Trade minimality for fewer edit regions, see [`cleanup_efficiency`].
    Efficiency,
}
impl Default for CleanupMode {
    fn default() -> Self {
        Self::Semantic
    }
}
impl CleanupMode {
    fn run(self, diffs: &mut Vec<Diff>, edit_cost: u32) {
        match self {
        Self::None => {},
        Self::Merge => cleanup_merge(diffs),
        Self::SemanticLossless => cleanup_semantic_lossless(diffs),
        Self::Semantic => cleanup_semantic(diffs),
        Self::Efficiency => cleanup_efficiency(diffs, edit_cost),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanupOptions {
    pub mode: CleanupMode,

    /// Cost of an empty edit operation in terms of characters, used by
    /// [`CleanupMode::Efficiency`].
    pub edit_cost: u32,
}
impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            mode: CleanupMode::default(),
            edit_cost: DEFAULT_EDIT_COST,
        }
    }
}

/// Apply the configured cleanup to `diffs`.
pub fn cleanup(diffs: &mut Vec<Diff>, options: &CleanupOptions) {
    options.mode.run(diffs, options.edit_cost);
}
