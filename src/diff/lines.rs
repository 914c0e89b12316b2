// SPDX-License-Identifier: MIT

//! Line-granularity diffing of large texts: every distinct line is replaced
//! by a small integer id, so that the element-wise algorithms operate on
//! whole lines instead of characters.

use std::collections::HashMap;

use crate::diff::{Diff, HashedDiff};
use crate::utils::*;

/// Index into [`EncodedLines::unique_lines`].
pub type LineId = u32;

/// Dictionary size at which the rest of the first text is folded into a
/// single line.
const MAX_LINES_TEXT1: usize = 40_000;

/// Dictionary size at which the rest of the second text is folded into a
/// single line.
const MAX_LINES_TEXT2: usize = 65_535;

/// Two texts encoded as sequences of line ids.
///
/// `unique_lines[0]` is always the empty string. Lines keep their trailing
/// newline, so the empty string never stands for a real line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLines<'a> {
    pub text1: Vec<LineId>,
    pub text2: Vec<LineId>,
    pub unique_lines: Vec<&'a str>,
}

struct LineEncoder<'a> {
    unique_lines: Vec<&'a str>,
    ids: HashMap<&'a str, LineId>,
}
impl<'a> LineEncoder<'a> {
    fn new() -> Self {
        Self {
            unique_lines: vec![""],
            ids: HashMap::from([("", 0)]),
        }
    }

    /// Encode `text` line by line, growing the shared dictionary.
    ///
    /// Once the dictionary holds `max_lines` entries, everything from the
    /// first unseen line onward becomes one final line.
    fn encode(&mut self, text: &'a str, max_lines: usize) -> Vec<LineId> {
        let mut encoded = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let mut line = match rest.find('\n') {
                Some(idx) => &rest[..idx + 1],
                None => rest,
            };
            let id = match self.ids.get(line) {
                Some(&id) => id,
                None => {
                    if self.unique_lines.len() >= max_lines {
                        line = rest;
                    }
                    let id = self.unique_lines.len() as LineId;
                    self.ids.insert(line, id);
                    self.unique_lines.push(line);
                    id
                },
            };
            encoded.push(id);
            rest = &rest[line.len()..];
        }
        encoded
    }
}

/// Encode both texts into line ids drawn from one shared dictionary, so that
/// equal lines in either text get the same id.
pub fn lines_to_chars<'a>(text1: &'a str, text2: &'a str) -> EncodedLines<'a> {
    let mut encoder = LineEncoder::new();
    let encoded1 = encoder.encode(text1, MAX_LINES_TEXT1);
    let encoded2 = encoder.encode(text2, MAX_LINES_TEXT2);

    #[cfg(feature = "debug-diff")]
    println!("lines_to_chars: {} + {} lines, {} unique",
             encoded1.len(), encoded2.len(), encoder.unique_lines.len() - 1);

    EncodedLines {
        text1: encoded1,
        text2: encoded2,
        unique_lines: encoder.unique_lines,
    }
}

/// Turn a diff over line ids back into a diff over text.
///
/// Every id must be a valid index into `unique_lines`.
pub fn rehydrate<S: AsRef<str>>(hashed: &HashedDiff, unique_lines: &[S]) -> Result<Diff> {
    if unique_lines.is_empty() {
        return Err(err_from_str("cannot rehydrate line ids without a line table"));
    }

    let text = hashed.text().iter()
        .flat_map(|&id| unique_lines[id as usize].as_ref().chars())
        .collect();
    Ok(Diff::new(hashed.op(), text))
}

/// Rehydrate a whole diff over line ids.
pub fn chars_to_lines<S: AsRef<str>>(diffs: &[HashedDiff], unique_lines: &[S]) -> Result<Vec<Diff>> {
    diffs.iter()
        .map(|diff| rehydrate(diff, unique_lines))
        .collect()
}
