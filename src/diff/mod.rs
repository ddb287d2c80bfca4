//! Diff module for comparing declared resources with live objects.
//!
//! This module masks server-omitted fields, turns documents into their
//! canonical text, diffs that text line by line, renders the result and
//! classifies each resource.

mod canonical;
mod compare;
mod lines;
mod mask;
mod render;

pub use canonical::canonical_text;
pub use compare::{Classification, CompareOptions, Comparator, ComparisonResult, Outcome};
pub use lines::{DiffSegment, SegmentKind, diff_lines};
pub use mask::{is_empty_value, mask_fields};
pub use render::{redact_secrets, render_segments};
