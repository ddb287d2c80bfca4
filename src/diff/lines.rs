//! Line-granular text diffing.
//!
//! Each line is diffed as one token so cost scales with the number of lines
//! and every segment covers whole lines.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Kind of a diff segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Lines only present in the new (declared) text.
    Insert,
    /// Lines only present in the old (live) text.
    Delete,
    /// Lines present in both texts.
    Equal,
}

/// A maximal run of lines with the same [`SegmentKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    /// Segment kind.
    pub kind: SegmentKind,
    /// The lines, newline characters included.
    pub text: String,
}

impl DiffSegment {
    /// Creates a segment.
    #[must_use]
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Diffs `old` against `new` line by line.
///
/// Equal texts always produce exactly one [`SegmentKind::Equal`] segment;
/// different texts always produce at least one insert or delete.
#[must_use]
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffSegment> {
    if old == new {
        return vec![DiffSegment::new(SegmentKind::Equal, old)];
    }

    let diff = TextDiff::from_lines(old, new);
    let mut segments: Vec<DiffSegment> = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Equal,
            ChangeTag::Delete => SegmentKind::Delete,
            ChangeTag::Insert => SegmentKind::Insert,
        };
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => segments.push(DiffSegment::new(kind, change.value())),
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(segments: &[DiffSegment], skip: SegmentKind) -> String {
        segments
            .iter()
            .filter(|s| s.kind != skip)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn test_equal_texts_are_one_segment() {
        let text = "{\n  \"a\": 1\n}\n";
        assert_eq!(
            diff_lines(text, text),
            vec![DiffSegment::new(SegmentKind::Equal, text)]
        );
    }

    #[test]
    fn test_changed_line() {
        let old = "a\nb\nc\n";
        let new = "a\nB\nc\n";
        assert_eq!(
            diff_lines(old, new),
            vec![
                DiffSegment::new(SegmentKind::Equal, "a\n"),
                DiffSegment::new(SegmentKind::Delete, "b\n"),
                DiffSegment::new(SegmentKind::Insert, "B\n"),
                DiffSegment::new(SegmentKind::Equal, "c\n"),
            ]
        );
    }

    #[test]
    fn test_sides_reconstruct_inputs() {
        let old = "{\n  \"a\": 1,\n  \"b\": 2,\n  \"status\": {}\n}\n";
        let new = "{\n  \"a\": 1,\n  \"b\": 3,\n  \"c\": 4\n}\n";
        let segments = diff_lines(old, new);

        assert_eq!(side(&segments, SegmentKind::Insert), old);
        assert_eq!(side(&segments, SegmentKind::Delete), new);
        assert!(segments.iter().any(|s| s.kind != SegmentKind::Equal));
    }

    #[test]
    fn test_adjacent_changes_are_coalesced() {
        let segments = diff_lines("x\ny\n", "p\nq\n");
        let kinds: Vec<_> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SegmentKind::Delete, SegmentKind::Insert]);
        assert_eq!(segments[0].text, "x\ny\n");
        assert_eq!(segments[1].text, "p\nq\n");
    }
}
