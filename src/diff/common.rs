// SPDX-License-Identifier: MIT

//! Primitive comparisons of element sequences that the rest of the diff
//! machinery is built from.

/// Length of the longest common prefix of `a` and `b`.
pub fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b.iter())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest common suffix of `a` and `b`.
pub fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().rev().zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
pub fn common_overlap<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0
    }

    // Only the tail of `a` and the head of `b` can take part in an overlap.
    let len = std::cmp::min(a.len(), b.len());
    let a = &a[a.len() - len..];
    let b = &b[..len];
    if a == b {
        return len
    }

    // Grow a candidate suffix of `a` and look for it in `b`. Every occurrence
    // tells us how far the candidate must grow before it can possibly line up
    // with the start of `b`.
    let mut best = 0;
    let mut length = 1;
    while length <= len {
        let Some(found) = find(b, &a[len - length..]) else { break };
        length += found;
        if found == 0 || a[len - length..] == b[..length] {
            best = length;
            length += 1;
        }
    }
    best
}

/// Offset of the first occurrence of `needle` in `haystack`.
pub(crate) fn find<T: PartialEq>(haystack: &[T], needle: &[T]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0)
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
