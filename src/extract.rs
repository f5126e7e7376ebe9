//! Content extraction for positional mappings
//!
//! Given file bytes and an optional [`PositionSpec`], returns exactly the
//! designated bytes after line-ending normalization. CRLF is normalized to
//! LF before line-splitting so the same logical region hashes identically
//! regardless of the committer's platform; a lone `\r` is left alone.
//!
//! `L1-EOF` over any content is byte-identical to the whole normalized
//! content, which makes "whole file" and "positional, full range" extraction
//! hash-equivalent. The drift engine relies on that.

use std::borrow::Cow;

use crate::error::{VendoError, VendoResult};
use crate::position::PositionSpec;

/// Normalize CRLF to LF. A `\r` not followed by `\n` is untouched.
pub fn normalize_line_endings(content: &[u8]) -> Cow<'_, [u8]> {
    if !content.windows(2).any(|w| w == b"\r\n") {
        return Cow::Borrowed(content);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        if content[i] == b'\r' && content.get(i + 1) == Some(&b'\n') {
            i += 1; // drop the \r, keep the \n
            continue;
        }
        out.push(content[i]);
        i += 1;
    }
    Cow::Owned(out)
}

/// Extract the bytes a mapping denotes from `content`.
///
/// With no spec this is the whole normalized content. With a spec, lines are
/// split on `\n` (a trailing newline produces one extra empty trailing line,
/// so `L<n>-EOF` on a newline-terminated file includes that byte). Column
/// ranges slice the selected lines by inclusive 1-indexed byte offset; a
/// range that splits a multi-byte character is accepted, UTF-8 validity is
/// the caller's concern.
///
/// Fails with [`VendoError::LineOutOfRange`] when the start line exceeds the
/// actual line count. An end line past the last line is clamped.
pub fn extract(content: &[u8], spec: Option<&PositionSpec>) -> VendoResult<Vec<u8>> {
    let normalized = normalize_line_endings(content);
    let Some(spec) = spec else {
        return Ok(normalized.into_owned());
    };

    let content = normalized.as_ref();
    let starts = line_starts(content);
    let count = starts.len();

    let start_line = spec.start_line() as usize;
    if start_line > count {
        return Err(VendoError::LineOutOfRange {
            start: spec.start_line(),
            lines: count,
        });
    }

    let bytes = match *spec {
        PositionSpec::LineToEof(n) => &content[starts[n as usize - 1]..],
        PositionSpec::Line(n) => {
            let idx = n as usize - 1;
            &content[starts[idx]..line_end(content, &starts, idx)]
        }
        PositionSpec::LineRange(n, m) => {
            let last = (m as usize).min(count) - 1;
            &content[starts[n as usize - 1]..line_end(content, &starts, last)]
        }
        PositionSpec::ColumnRange {
            start_line,
            start_col,
            end_line,
            end_col,
        } => {
            let first = start_line as usize - 1;
            let last = (end_line as usize).min(count) - 1;
            let first_end = line_end(content, &starts, first);
            let last_end = line_end(content, &starts, last);
            // Columns are clamped to the line they address.
            let begin = (starts[first] + start_col as usize - 1).min(first_end);
            let end = (starts[last] + end_col as usize).min(last_end);
            if begin >= end {
                &[]
            } else {
                &content[begin..end]
            }
        }
    };

    Ok(bytes.to_vec())
}

/// Byte offsets where each line starts. A trailing `\n` yields a final
/// empty line starting at `content.len()`.
fn line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &b) in content.iter().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Exclusive end offset of line `idx` (0-based), not counting its `\n`.
fn line_end(content: &[u8], starts: &[usize], idx: usize) -> usize {
    if idx + 1 < starts.len() {
        starts[idx + 1] - 1
    } else {
        content.len()
    }
}
