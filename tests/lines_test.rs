// SPDX-License-Identifier: MIT

use diff_cleanup::*;
use diff::{Diff, Operation};
use utils::Result;

fn numbered_lines(count: usize) -> String {
    (1..=count).map(|n| format!("{}\n", n)).collect()
}

fn round_trip(encoded: &[diff::LineId], unique_lines: &[&str]) -> Result<String> {
    let hashed = Diff::new(Operation::Insert, encoded.to_vec());
    let rehydrated = diff::rehydrate(&hashed, unique_lines)?;
    assert_eq!(rehydrated.op(), Operation::Insert);
    Ok(rehydrated.text_string())
}

#[test]
fn more_than_256_lines() -> Result<()> {
    let text = numbered_lines(300);
    let encoded = diff::lines_to_chars(&text, "");

    assert_eq!(encoded.text1, (1..=300).collect::<Vec<diff::LineId>>());
    assert!(encoded.text2.is_empty());
    assert_eq!(encoded.unique_lines.len(), 301);
    assert_eq!(round_trip(&encoded.text1, &encoded.unique_lines)?, text);

    Ok(())
}

#[test]
fn first_text_cap() -> Result<()> {
    let text = numbered_lines(40_010);
    let encoded = diff::lines_to_chars(&text, "");

    // The remainder of the text from the 40000th line on is a single line.
    assert_eq!(encoded.text1.len(), 40_000);
    assert_eq!(encoded.unique_lines.len(), 40_001);
    let last = encoded.unique_lines[40_000];
    assert!(last.starts_with("40000\n"));
    assert!(last.ends_with("40010\n"));
    assert_eq!(round_trip(&encoded.text1, &encoded.unique_lines)?, text);

    Ok(())
}

#[test]
fn second_text_cap() -> Result<()> {
    let text = numbered_lines(66_000);
    let encoded = diff::lines_to_chars("", &text);

    assert!(encoded.text1.is_empty());
    assert_eq!(encoded.text2.len(), 65_535);
    assert_eq!(encoded.unique_lines.len(), 65_536);
    assert_eq!(round_trip(&encoded.text2, &encoded.unique_lines)?, text);

    Ok(())
}

#[test]
fn caps_share_the_dictionary() -> Result<()> {
    let text1 = numbered_lines(40_005);
    let text2 = numbered_lines(70_000);
    let encoded = diff::lines_to_chars(&text1, &text2);

    // Lines seen in the first text keep their ids in the second.
    assert_eq!(encoded.text1.len(), 40_000);
    assert_eq!(&encoded.text2[..39_999], &encoded.text1[..39_999]);
    assert_eq!(encoded.unique_lines.len(), 65_536);
    assert_eq!(round_trip(&encoded.text1, &encoded.unique_lines)?, text1);
    assert_eq!(round_trip(&encoded.text2, &encoded.unique_lines)?, text2);

    Ok(())
}

#[test]
fn line_diff_round_trip() -> Result<()> {
    let text1 = "alpha\nbeta\ngamma\ndelta\n";
    let text2 = "alpha\ngamma\nepsilon\ndelta\n";
    let encoded = diff::lines_to_chars(text1, text2);
    assert_eq!(encoded.text1, [1, 2, 3, 4]);
    assert_eq!(encoded.text2, [1, 3, 5, 4]);

    // A line-level diff as an external driver would produce it, in raw form.
    let mut hashed = vec![
        Diff::new(Operation::Equal, vec![1]),
        Diff::new(Operation::Delete, vec![2]),
        Diff::new(Operation::Equal, vec![]),
        Diff::new(Operation::Equal, vec![3]),
        Diff::new(Operation::Insert, vec![5]),
        Diff::new(Operation::Equal, vec![4]),
    ];
    diff::cleanup_merge(&mut hashed);
    assert_eq!(hashed.len(), 5);

    let diffs = diff::chars_to_lines(&hashed, &encoded.unique_lines)?;
    assert_eq!(diffs, vec![
        Diff::equal("alpha\n"),
        Diff::delete("beta\n"),
        Diff::equal("gamma\n"),
        Diff::insert("epsilon\n"),
        Diff::equal("delta\n"),
    ]);
    assert_eq!(diff::source_text(&diffs), text1);
    assert_eq!(diff::destination_text(&diffs), text2);

    Ok(())
}
