// SPDX-License-Identifier: MIT

//! Passes that rewrite a diff into an equivalent but smaller or more readable
//! one.
//!
//! All passes preserve the source and destination texts of the diff. They
//! work on indices into the diff vector and rewind the index where a rewrite
//! can change the outcome for records that were already visited.

use crate::diff::*;

/// Collapse a diff into canonical form.
///
/// Neighbouring records of the same operation are merged, empty records are
/// removed, text shared by the deletions and insertions of one edit region is
/// factored out into the surrounding equalities, and single edits that are
/// rotations of a neighbouring equality are slid over it.
///
/// The result has no empty records and no two neighbours with the same
/// operation. Each edit region between two equalities consists of at most one
/// deletion followed by at most one insertion.
pub fn cleanup_merge<T: Clone + PartialEq>(diffs: &mut Vec<Diff<T>>) {
    loop {
        merge_runs(diffs);
        if !slide_single_edits(diffs) {
            break
        }
    }
}

/// Single left-to-right pass that merges each run of edits between two
/// equalities into at most one deletion and one insertion.
fn merge_runs<T: Clone + PartialEq>(diffs: &mut Vec<Diff<T>>) {
    // Sentinel to flush a trailing edit region.
    diffs.push(Diff::new(Operation::Equal, Vec::new()));

    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<T> = Vec::new();
    let mut text_insert: Vec<T> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].op() {
        Operation::Insert | Operation::Delete if diffs[pointer].is_empty() => {
            diffs.remove(pointer);
        },
        Operation::Insert => {
            count_insert += 1;
            text_insert.extend_from_slice(diffs[pointer].text());
            pointer += 1;
        },
        Operation::Delete => {
            count_delete += 1;
            text_delete.extend_from_slice(diffs[pointer].text());
            pointer += 1;
        },
        Operation::Equal if diffs[pointer].is_empty() && pointer + 1 != diffs.len() => {
            // Separates nothing: the edits on both sides form a single region.
            diffs.remove(pointer);
        },
        Operation::Equal => {
            if count_delete + count_insert > 1 {
                if count_delete != 0 && count_insert != 0 {
                    let prefix_len = common_prefix(&text_insert, &text_delete);
                    if prefix_len != 0 {
                        let prefix: Vec<T> = text_insert.drain(..prefix_len).collect();
                        text_delete.drain(..prefix_len);

                        let region = pointer - count_delete - count_insert;
                        if region > 0 && diffs[region - 1].op() == Operation::Equal {
                            let mut text = diffs[region - 1].text().to_vec();
                            text.extend(prefix);
                            diffs[region - 1] = Diff::new(Operation::Equal, text);
                        } else {
                            diffs.insert(0, Diff::new(Operation::Equal, prefix));
                            pointer += 1;
                        }
                    }

                    let suffix_len = common_suffix(&text_insert, &text_delete);
                    if suffix_len != 0 {
                        let mut text = text_insert.split_off(text_insert.len() - suffix_len);
                        text_delete.truncate(text_delete.len() - suffix_len);
                        text.extend_from_slice(diffs[pointer].text());
                        diffs[pointer] = Diff::new(Operation::Equal, text);
                    }
                }

                // Replace the region by the merged records.
                let region = pointer - count_delete - count_insert;
                let mut merged = Vec::new();
                if !text_delete.is_empty() {
                    merged.push(Diff::new(Operation::Delete, std::mem::take(&mut text_delete)));
                }
                if !text_insert.is_empty() {
                    merged.push(Diff::new(Operation::Insert, std::mem::take(&mut text_insert)));
                }
                let num_merged = merged.len();
                diffs.splice(region..pointer, merged);
                if num_merged == 0 {
                    // The region dissolved completely; revisit the equality so
                    // that it is joined with its predecessor.
                    pointer = region;
                } else {
                    pointer = region + num_merged + 1;
                }
            } else if pointer != 0 && diffs[pointer - 1].op() == Operation::Equal {
                // Only reachable without edits in between: two equalities.
                let mut text = diffs[pointer - 1].text().to_vec();
                text.extend_from_slice(diffs[pointer].text());
                diffs[pointer - 1] = Diff::new(Operation::Equal, text);
                diffs.remove(pointer);
            } else {
                pointer += 1;
            }

            count_delete = 0;
            count_insert = 0;
            text_delete.clear();
            text_insert.clear();
        },
        }
    }

    if diffs.last().map_or(false, |diff| diff.is_empty()) {
        diffs.pop();
    }
}

/// Slide single edits surrounded by equalities to one side where the edit is
/// a rotation of one of the equalities, eliminating that equality. For
/// example, `A<ins>BA</ins>C` becomes `<ins>AB</ins>AC`.
///
/// Returns whether any change was made.
fn slide_single_edits<T: Clone + PartialEq>(diffs: &mut Vec<Diff<T>>) -> bool {
    let mut changes = false;
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op() == Operation::Equal &&
           diffs[pointer + 1].op() == Operation::Equal {
            let op = diffs[pointer].op();
            let prev = diffs[pointer - 1].text();
            let edit = diffs[pointer].text();
            let next = diffs[pointer + 1].text();

            if edit.ends_with(prev) {
                // Shift the edit over the previous equality.
                let mut new_edit = prev.to_vec();
                new_edit.extend_from_slice(&edit[..edit.len() - prev.len()]);
                let mut new_next = prev.to_vec();
                new_next.extend_from_slice(next);

                diffs[pointer] = Diff::new(op, new_edit);
                diffs[pointer + 1] = Diff::new(Operation::Equal, new_next);
                diffs.remove(pointer - 1);
                changes = true;
            } else if edit.starts_with(next) {
                // Shift the edit over the next equality.
                let mut new_prev = prev.to_vec();
                new_prev.extend_from_slice(next);
                let mut new_edit = edit[next.len()..].to_vec();
                new_edit.extend_from_slice(next);

                diffs[pointer - 1] = Diff::new(Operation::Equal, new_prev);
                diffs[pointer] = Diff::new(op, new_edit);
                diffs.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }

    #[cfg(feature = "debug-diff")]
    if changes {
        println!("cleanup_merge: slid single edits, now {} records", diffs.len());
    }

    changes
}

/// Turn the equality at `idx` into a deletion followed by an insertion of
/// the same text.
fn split_equality<T: Clone>(diffs: &mut Vec<Diff<T>>, idx: usize) {
    let text = diffs[idx].text().to_vec();
    diffs[idx] = Diff::new(Operation::Insert, text.clone());
    diffs.insert(idx, Diff::new(Operation::Delete, text));
}

/// Reduce the number of edits by eliminating semantically trivial
/// equalities, then align the remaining edits with natural text boundaries
/// and pull out overlaps between neighbouring deletions and insertions.
pub fn cleanup_semantic(diffs: &mut Vec<Diff>) {
    if eliminate_trivial_equalities(diffs) {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);
    extract_overlaps(diffs);
}

/// Total length of deletions and insertions on one side of an equality.
#[derive(Debug, Default, Clone, Copy)]
struct EditLengths {
    delete: usize,
    insert: usize,
}
impl EditLengths {
    fn max(&self) -> usize {
        std::cmp::max(self.delete, self.insert)
    }
}

/// Split every equality that is no longer than the edits on both of its sides
/// into a deletion and an insertion.
///
/// Returns whether anything was split. The diff needs to be merged afterwards.
fn eliminate_trivial_equalities<T: Clone>(diffs: &mut Vec<Diff<T>>) -> bool {
    let mut changes = false;

    // Indices of candidate equalities, innermost last.
    let mut equalities: Vec<usize> = Vec::new();
    // Length of the most recent candidate, if it is still eligible.
    let mut last_equality: Option<usize> = None;
    let mut before = EditLengths::default();
    let mut after = EditLengths::default();

    let mut pointer = 0;
    while pointer < diffs.len() {
        let diff = &diffs[pointer];
        match diff.op() {
        Operation::Equal => {
            equalities.push(pointer);
            before = after;
            after = EditLengths::default();
            last_equality = Some(diff.len());
        },
        Operation::Delete | Operation::Insert => {
            if diff.op() == Operation::Insert {
                after.insert += diff.len();
            } else {
                after.delete += diff.len();
            }

            if let Some(len) = last_equality {
                if len <= std::cmp::min(before.max(), after.max()) {
                    let Some(idx) = equalities.pop() else { panic!() };

                    #[cfg(feature = "debug-diff")]
                    println!("cleanup_semantic: eliminate equality at {} (len {})", idx, len);

                    split_equality(diffs, idx);

                    // The previous equality may have become eligible.
                    equalities.pop();
                    last_equality = None;
                    before = EditLengths::default();
                    after = EditLengths::default();
                    changes = true;

                    match equalities.last() {
                        Some(&idx) => pointer = idx,
                        None => {
                            pointer = 0;
                            continue
                        },
                    }
                }
            }
        },
        }
        pointer += 1;
    }

    changes
}

/// Look for deletions directly followed by insertions where the end of one
/// overlaps the start of the other, and turn a sufficiently large overlap
/// into an equality.
///
/// For example `<del>abcxxx</del><ins>xxxdef</ins>` becomes
/// `<del>abc</del>xxx<ins>def</ins>`, and `<del>xxxabc</del><ins>defxxx</ins>`
/// becomes `<ins>def</ins>xxx<del>abc</del>`. An overlap qualifies if it is at
/// least half as long as the shorter of the two edits.
fn extract_overlaps<T: Clone + PartialEq>(diffs: &mut Vec<Diff<T>>) {
    let mut pointer = 1;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op() == Operation::Delete &&
           diffs[pointer].op() == Operation::Insert {
            let deletion = diffs[pointer - 1].text().to_vec();
            let insertion = diffs[pointer].text().to_vec();
            let forward = common_overlap(&deletion, &insertion);
            let reverse = common_overlap(&insertion, &deletion);

            // Compare 2 * overlap against the length to keep exact halves.
            let min_len = std::cmp::min(deletion.len(), insertion.len());
            let qualifies = |overlap: usize| overlap != 0 && overlap * 2 >= min_len;

            if forward >= reverse {
                if qualifies(forward) {
                    diffs.splice(pointer - 1..pointer + 1, [
                        Diff::new(Operation::Delete, deletion[..deletion.len() - forward].to_vec()),
                        Diff::new(Operation::Equal, insertion[..forward].to_vec()),
                        Diff::new(Operation::Insert, insertion[forward..].to_vec()),
                    ]);
                    pointer += 1;
                }
            } else if qualifies(reverse) {
                diffs.splice(pointer - 1..pointer + 1, [
                    Diff::new(Operation::Insert, insertion[..insertion.len() - reverse].to_vec()),
                    Diff::new(Operation::Equal, deletion[..reverse].to_vec()),
                    Diff::new(Operation::Delete, deletion[reverse..].to_vec()),
                ]);
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Reduce the number of edits by eliminating operationally trivial
/// equalities.
///
/// An equality is trivial if splitting it costs less than the `edit_cost`
/// of the edit operations it separates. For example, with an edit cost of 4
/// and edits on both sides, `<del>ab</del><ins>12</ins>xyz<del>cd</del><ins>34</ins>`
/// becomes `<del>abxyzcd</del><ins>12xyz34</ins>`.
pub fn cleanup_efficiency<T: Clone + PartialEq>(diffs: &mut Vec<Diff<T>>, edit_cost: u32) {
    let edit_cost = edit_cost as usize;
    let mut changes = false;

    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    // Whether there was a deletion / insertion before the last candidate
    // equality, and after it.
    let mut pre_delete = false;
    let mut pre_insert = false;
    let mut post_delete = false;
    let mut post_insert = false;

    let mut pointer = 0;
    while pointer < diffs.len() {
        let diff = &diffs[pointer];
        match diff.op() {
        Operation::Equal => {
            if diff.len() < edit_cost && (post_insert || post_delete) {
                equalities.push(pointer);
                pre_insert = post_insert;
                pre_delete = post_delete;
                last_equality = Some(diff.len());
            } else {
                // Too long to ever be eliminated; start over behind it.
                equalities.clear();
                last_equality = None;
            }
            post_insert = false;
            post_delete = false;
        },
        Operation::Delete | Operation::Insert => {
            if diff.op() == Operation::Delete {
                post_delete = true;
            } else {
                post_insert = true;
            }

            // Split candidates of the shapes
            //   <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
            //   <ins>A</ins>X<ins>C</ins><del>D</del>
            //   <ins>A</ins><del>B</del>X<ins>C</ins>
            //   <del>A</del>X<ins>C</ins><del>D</del>
            //   <ins>A</ins><del>B</del>X<del>C</del>
            if let Some(len) = last_equality {
                let sides = [pre_insert, pre_delete, post_insert, post_delete]
                    .iter().filter(|&&side| side).count();
                if sides == 4 || (len * 2 < edit_cost && sides == 3) {
                    let Some(idx) = equalities.pop() else { panic!() };

                    #[cfg(feature = "debug-diff")]
                    println!("cleanup_efficiency: eliminate equality at {} (len {})", idx, len);

                    split_equality(diffs, idx);
                    last_equality = None;
                    changes = true;

                    if pre_insert && pre_delete {
                        // No changes made which could affect previous entry,
                        // keep going.
                        post_insert = true;
                        post_delete = true;
                        equalities.clear();
                    } else {
                        equalities.pop();
                        post_insert = false;
                        post_delete = false;
                        match equalities.last() {
                            Some(&idx) => pointer = idx,
                            None => {
                                pointer = 0;
                                continue
                            },
                        }
                    }
                }
            }
        },
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn d(text: &str) -> Diff {
        Diff::delete(text)
    }
    fn i(text: &str) -> Diff {
        Diff::insert(text)
    }
    fn e(text: &str) -> Diff {
        Diff::equal(text)
    }

    fn merged(mut diffs: Vec<Diff>) -> Vec<Diff> {
        cleanup_merge(&mut diffs);
        diffs
    }

    fn semantic(mut diffs: Vec<Diff>) -> Vec<Diff> {
        cleanup_semantic(&mut diffs);
        diffs
    }

    fn efficient(mut diffs: Vec<Diff>, edit_cost: u32) -> Vec<Diff> {
        cleanup_efficiency(&mut diffs, edit_cost);
        diffs
    }

    #[test]
    fn merge_basic() {
        assert_eq!(merged(vec![]), vec![]);
        assert_eq!(merged(vec![e("a"), d("b"), i("c")]), vec![e("a"), d("b"), i("c")]);
        assert_eq!(merged(vec![e("a"), e("b"), e("c")]), vec![e("abc")]);
        assert_eq!(merged(vec![d("a"), d("b"), d("c")]), vec![d("abc")]);
        assert_eq!(merged(vec![i("a"), i("b"), i("c")]), vec![i("abc")]);
        assert_eq!(merged(vec![d("a"), i("b"), d("c"), i("d"), e("e"), e("f")]),
                   vec![d("ac"), i("bd"), e("ef")]);
    }

    #[test]
    fn merge_common_affixes() {
        assert_eq!(merged(vec![d("a"), i("abc")]), vec![e("a"), i("bc")]);
        assert_eq!(merged(vec![d("a"), i("abc"), d("dc")]),
                   vec![e("a"), d("d"), i("b"), e("c")]);
        assert_eq!(merged(vec![e("x"), d("a"), i("abc"), d("dc"), e("y")]),
                   vec![e("xa"), d("d"), i("b"), e("cy")]);
        assert_eq!(merged(vec![d("b"), i("ab"), e("c")]), vec![i("a"), e("bc")]);
    }

    #[test]
    fn merge_slide() {
        assert_eq!(merged(vec![e("a"), i("ba"), e("c")]), vec![i("ab"), e("ac")]);
        assert_eq!(merged(vec![e("c"), i("ab"), e("a")]), vec![e("ca"), i("ba")]);
        assert_eq!(merged(vec![e("a"), d("b"), e("c"), d("ac"), e("x")]),
                   vec![d("abc"), e("acx")]);
        assert_eq!(merged(vec![e("x"), d("ca"), e("c"), d("b"), e("a")]),
                   vec![e("xca"), d("cba")]);
    }

    #[test]
    fn merge_empty_records() {
        assert_eq!(merged(vec![e(""), i("a"), e("b")]), vec![i("a"), e("b")]);
        assert_eq!(merged(vec![d("a"), e(""), i("b")]), vec![d("a"), i("b")]);
        assert_eq!(merged(vec![d(""), e("x"), i("")]), vec![e("x")]);
        assert_eq!(merged(vec![e("")]), vec![]);
    }

    #[test]
    fn merge_dissolved_region() {
        assert_eq!(merged(vec![e("x"), d("a"), i("a"), e("y")]), vec![e("xay")]);
        assert_eq!(merged(vec![d("a"), i("a")]), vec![e("a")]);
        assert_eq!(merged(vec![d("ab"), i("a"), d("c"), i("bc")]), vec![e("abc")]);
    }

    #[test]
    fn merge_line_ids() {
        let mut diffs: Vec<HashedDiff> = vec![
            Diff::new(Operation::Delete, vec![1, 2]),
            Diff::new(Operation::Insert, vec![1, 3]),
            Diff::new(Operation::Insert, vec![4]),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![
            Diff::new(Operation::Equal, vec![1]),
            Diff::new(Operation::Delete, vec![2]),
            Diff::new(Operation::Insert, vec![3, 4]),
        ]);
    }

    #[test]
    fn semantic_no_elimination() {
        assert_eq!(semantic(vec![]), vec![]);
        assert_eq!(semantic(vec![d("ab"), i("cd"), e("12"), d("e")]),
                   vec![d("ab"), i("cd"), e("12"), d("e")]);
        assert_eq!(semantic(vec![d("abc"), i("ABC"), e("1234"), d("wxyz")]),
                   vec![d("abc"), i("ABC"), e("1234"), d("wxyz")]);
    }

    #[test]
    fn semantic_elimination() {
        assert_eq!(semantic(vec![d("a"), e("b"), d("c")]), vec![d("abc"), i("b")]);
        assert_eq!(semantic(vec![d("ab"), e("cd"), d("e"), e("f"), i("g")]),
                   vec![d("abcdef"), i("cdfg")]);
        assert_eq!(semantic(vec![i("1"), e("A"), d("B"), i("2"), e("_"),
                                 i("1"), e("A"), d("B"), i("2")]),
                   vec![d("AB_AB"), i("1A2_1A2")]);
        // Eliminating "b" also drops "x" from the candidates and rescans
        // from the start, where "x" is no longer eligible.
        assert_eq!(semantic(vec![e("x"), d("a"), e("b"), d("c")]),
                   vec![e("x"), d("abc"), i("b")]);
    }

    #[test]
    fn semantic_word_boundaries() {
        assert_eq!(semantic(vec![e("The c"), d("ow and the c"), e("at.")]),
                   vec![e("The "), d("cow and the "), e("cat.")]);
    }

    #[test]
    fn semantic_overlaps() {
        assert_eq!(semantic(vec![d("abcxx"), i("xxdef")]), vec![d("abcxx"), i("xxdef")]);
        assert_eq!(semantic(vec![d("abcxxx"), i("xxxdef")]),
                   vec![d("abc"), e("xxx"), i("def")]);
        assert_eq!(semantic(vec![d("xxxabc"), i("defxxx")]),
                   vec![i("def"), e("xxx"), d("abc")]);
        assert_eq!(semantic(vec![d("abcd1212"), i("1212efghi"), e("----"), d("A3"), i("3BC")]),
                   vec![d("abcd"), e("1212"), i("efghi"), e("----"), d("A"), e("3"), i("BC")]);
    }

    #[test]
    fn efficiency() {
        assert_eq!(efficient(vec![], 4), vec![]);
        assert_eq!(efficient(vec![d("ab"), i("12"), e("wxyz"), d("cd"), i("34")], 4),
                   vec![d("ab"), i("12"), e("wxyz"), d("cd"), i("34")]);
        assert_eq!(efficient(vec![d("ab"), i("12"), e("xyz"), d("cd"), i("34")], 4),
                   vec![d("abxyzcd"), i("12xyz34")]);
        assert_eq!(efficient(vec![i("12"), e("x"), d("cd"), i("34")], 4),
                   vec![d("xcd"), i("12x34")]);
        assert_eq!(efficient(vec![d("ab"), i("12"), e("xy"), i("34"), e("z"), d("cd"), i("56")], 4),
                   vec![d("abxyzcd"), i("12xy34z56")]);
        assert_eq!(efficient(vec![d("ab"), i("12"), e("wxyz"), d("cd"), i("34")], 5),
                   vec![d("abwxyzcd"), i("12wxyz34")]);
    }
}
