// SPDX-License-Identifier: MIT

use crate::diff::*;

fn ends_with_blank_line(text: &[char]) -> bool {
    matches!(text, [.., '\n', '\n'] | [.., '\n', '\r', '\n'])
}

fn starts_with_blank_line(text: &[char]) -> bool {
    matches!(text, ['\n', '\n', ..] | ['\n', '\r', '\n', ..] |
                   ['\r', '\n', '\n', ..] | ['\r', '\n', '\r', '\n', ..])
}

/// Score how well a cut between `one` and `two` falls on a natural boundary,
/// from 6 (edge of the text) down to 0 (inside a word).
fn boundary_score(one: &[char], two: &[char]) -> u32 {
    let (Some(&char1), Some(&char2)) = (one.last(), two.first()) else {
        return 6
    };

    let non_alphanumeric1 = !char1.is_alphanumeric();
    let non_alphanumeric2 = !char2.is_alphanumeric();
    let whitespace1 = non_alphanumeric1 && char1.is_whitespace();
    let whitespace2 = non_alphanumeric2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\r' || char1 == '\n');
    let line_break2 = whitespace2 && (char2 == '\r' || char2 == '\n');
    let blank_line1 = line_break1 && ends_with_blank_line(one);
    let blank_line2 = line_break2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of a sentence.
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

fn concat(a: &[char], b: &[char]) -> Vec<char> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    result.extend_from_slice(a);
    result.extend_from_slice(b);
    result
}

/// Shift single edits that are surrounded by equalities sideways so that
/// their boundaries fall on word, sentence or line boundaries, e.g.
/// `The c<ins>at c</ins>ame.` becomes `The <ins>cat </ins>came.`
///
/// The set of edited characters stays the same, only the edits move.
pub fn cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op() != Operation::Equal ||
           diffs[pointer + 1].op() != Operation::Equal {
            pointer += 1;
            continue
        }

        let op = diffs[pointer].op();
        let original1 = diffs[pointer - 1].text();
        let original_edit = diffs[pointer].text();
        let original2 = diffs[pointer + 1].text();

        // Nothing can move unless the edit can be rotated into one of the
        // equalities.
        if original1.last() != original_edit.last() &&
           original_edit.first() != original2.first() {
            pointer += 1;
            continue
        }

        // First, shift the edit as far left as possible.
        let common = common_suffix(original1, original_edit);
        let split = original_edit.len() - common;
        let mut equality1 = original1[..original1.len() - common].to_vec();
        let mut edit = concat(&original_edit[split..], &original_edit[..split]);
        let mut equality2 = concat(&original_edit[split..], original2);

        // Second, step right one character at a time looking for the best
        // fit. Ties go to the later position so that edits end rather than
        // start with whitespace.
        let mut best_score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
        let mut best = (equality1.clone(), edit.clone(), equality2.clone());
        while !edit.is_empty() && edit.first() == equality2.first() {
            let ch = edit.remove(0);
            equality1.push(ch);
            edit.push(ch);
            equality2.remove(0);

            let score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
            if score >= best_score {
                best_score = score;
                best = (equality1.clone(), edit.clone(), equality2.clone());
            }
        }

        if diffs[pointer - 1].text() == &best.0[..] {
            pointer += 1;
            continue
        }

        #[cfg(feature = "debug-diff")]
        println!("cleanup_semantic_lossless: {:?} {:?} {:?} -> {:?} {:?} {:?}",
                 diffs[pointer - 1], diffs[pointer], diffs[pointer + 1],
                 best.0.iter().collect::<String>(),
                 best.1.iter().collect::<String>(),
                 best.2.iter().collect::<String>());

        let (best_equality1, best_edit, best_equality2) = best;
        if best_equality1.is_empty() {
            diffs.remove(pointer - 1);
            pointer -= 1;
        } else {
            diffs[pointer - 1] = Diff::new(Operation::Equal, best_equality1);
        }
        diffs[pointer] = Diff::new(op, best_edit);
        if best_equality2.is_empty() {
            diffs.remove(pointer + 1);
        } else {
            diffs[pointer + 1] = Diff::new(Operation::Equal, best_equality2);
            pointer += 1;
        }
    }
}
