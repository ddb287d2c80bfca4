//! Diff rendering.
//!
//! Segments become a unified-diff-like block with unlimited context:
//! inserted lines start with `+ `, deleted lines with `- ` and context lines
//! with two spaces. Redaction is a textual pass over the canonical JSON text
//! and only recognizes `"key": "value"` pairs laid out the way
//! [`canonical_text`](super::canonical_text) writes them.

use regex::Regex;
use std::sync::LazyLock;

use super::lines::{DiffSegment, SegmentKind};

/// Start of every non-empty line.
static DIFF_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\n)(.)").expect("line start pattern is valid"));

/// A `"key": "value"` pair with a token-like value.
static DIFF_KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([-._a-zA-Z0-9]+)":\s"([[:alnum:]=+]+)",?"#)
        .expect("key value pattern is valid")
});

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Rewrites every `"key": "value"` pair to `key: <omitted>`.
#[must_use]
pub fn redact_secrets(text: &str) -> String {
    DIFF_KEY_VALUE.replace_all(text, "${1}: <omitted>").into_owned()
}

fn prefix_lines(text: &str, marker: &str) -> String {
    DIFF_LINE_START
        .replace_all(text, format!("${{1}}{marker}${{2}}").as_str())
        .into_owned()
}

/// Renders diff segments as text.
///
/// With `color`, inserted and deleted blocks are wrapped in green and red
/// ANSI escapes. With `redact`, secret-looking values are replaced and
/// context lines are left out.
#[must_use]
pub fn render_segments(segments: &[DiffSegment], color: bool, redact: bool) -> String {
    let mut out = String::new();

    for segment in segments {
        let text = if redact {
            redact_secrets(&segment.text)
        } else {
            segment.text.clone()
        };

        match segment.kind {
            SegmentKind::Insert => push_block(&mut out, &prefix_lines(&text, "+ "), color.then_some(GREEN)),
            SegmentKind::Delete => push_block(&mut out, &prefix_lines(&text, "- "), color.then_some(RED)),
            SegmentKind::Equal => {
                if !redact {
                    out.push_str(&prefix_lines(&text, "  "));
                }
            }
        }
    }

    out
}

/// Drops the newline that ends the last rendered line, looking through a
/// trailing color reset.
pub(crate) fn trim_final_newline(mut rendered: String) -> String {
    if rendered.ends_with('\n') {
        rendered.pop();
    } else if rendered.ends_with(&format!("\n{RESET}")) {
        rendered.truncate(rendered.len() - RESET.len() - 1);
        rendered.push_str(RESET);
    }
    rendered
}

fn push_block(out: &mut String, block: &str, color: Option<&str>) {
    if let Some(code) = color {
        out.push_str(code);
        out.push_str(block);
        out.push_str(RESET);
    } else {
        out.push_str(block);
    }
}
