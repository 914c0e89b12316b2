// SPDX-License-Identifier: MIT

use super::common::{common_prefix, common_suffix, find};

/// A common substring of two texts that is at least half as long as the
/// longer text, together with the parts of both texts around it.
///
/// All spans borrow from the texts passed to [`half_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfMatch<'a, T> {
    pub text1_prefix: &'a [T],
    pub text1_suffix: &'a [T],
    pub text2_prefix: &'a [T],
    pub text2_suffix: &'a [T],
    pub common: &'a [T],
}

/// Find a common substring of `text1` and `text2` that is at least half the
/// length of the longer text, if one exists.
///
/// This is a speedup heuristic for splitting a diff problem in two. It may
/// miss a half-length match and it does not necessarily find the longest one.
pub fn half_match<'a, T: PartialEq>(text1: &'a [T], text2: &'a [T]) -> Option<HalfMatch<'a, T>> {
    let swapped = text1.len() <= text2.len();
    let (long, short) = if swapped { (text2, text1) } else { (text1, text2) };
    if long.len() < 4 || short.len() * 2 < long.len() {
        return None
    }

    // Seed from the start of the second and of the third quarter.
    let first = half_match_at(long, short, (long.len() + 3) / 4);
    let second = half_match_at(long, short, (long.len() + 1) / 2);
    let hm = match (first, second) {
        (None, None) => return None,
        (Some(hm), None) | (None, Some(hm)) => hm,
        (Some(first), Some(second)) => {
            if second.common.len() > first.common.len() { second } else { first }
        },
    };

    // Results are computed as (long, short); flip them back if needed.
    if swapped {
        Some(HalfMatch {
            text1_prefix: hm.text2_prefix,
            text1_suffix: hm.text2_suffix,
            text2_prefix: hm.text1_prefix,
            text2_suffix: hm.text1_suffix,
            common: hm.common,
        })
    } else {
        Some(hm)
    }
}

/// Does a substring of `short` exist within `long` such that the substring is
/// at least half the length of `long`?
///
/// The search is seeded by the quarter-length substring of `long` starting at
/// `seed_start`. Returns spans with `long` in the place of text 1.
fn half_match_at<'a, T: PartialEq>(long: &'a [T], short: &'a [T], seed_start: usize)
    -> Option<HalfMatch<'a, T>>
{
    let seed = &long[seed_start..seed_start + long.len() / 4];

    // (offset into short, suffix length, prefix length) of the best match.
    let mut best: Option<(usize, usize, usize)> = None;
    let mut best_len = 0;
    let mut from = 0;
    while let Some(found) = find(&short[from..], seed) {
        let offset = from + found;
        let prefix_len = common_prefix(&long[seed_start..], &short[offset..]);
        let suffix_len = common_suffix(&long[..seed_start], &short[..offset]);
        if best_len < prefix_len + suffix_len {
            best_len = prefix_len + suffix_len;
            best = Some((offset, suffix_len, prefix_len));
        }
        from = offset + 1;
    }

    let (offset, suffix_len, prefix_len) = best?;
    if best_len * 2 < long.len() {
        return None
    }

    Some(HalfMatch {
        text1_prefix: &long[..seed_start - suffix_len],
        text1_suffix: &long[seed_start + prefix_len..],
        text2_prefix: &short[..offset - suffix_len],
        text2_suffix: &short[offset + prefix_len..],
        common: &short[offset - suffix_len..offset + prefix_len],
    })
}
