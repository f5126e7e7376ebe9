//! Position specifier grammar and parser
//!
//! A mapping path may carry a `:L...` suffix addressing an exact line or
//! byte-column range inside a file:
//!
//! - `src/lib.rs:L5` - single line
//! - `src/lib.rs:L5-L9` (or `:L5:L9`) - inclusive line range
//! - `src/lib.rs:L5-EOF` - line 5 to end of file
//! - `src/lib.rs:L5C20:L5C45` - column-precise byte range
//!
//! The suffix trigger is specifically `:L<digit>`, not a bare `:`, so Windows
//! drive letters and incidental colons in paths are never misread as a
//! position marker.
//!
//! Columns are 1-indexed byte offsets, not code points. This keeps column
//! arithmetic O(1) and matches how diff tooling addresses text, at the cost
//! of requiring authors not to split multi-byte characters.

use std::fmt;

use crate::error::{VendoError, VendoResult};

/// A parsed position specifier addressing a sub-range of a file.
///
/// Immutable value with no identity beyond its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionSpec {
    /// A single line (`L5`)
    Line(u32),
    /// An inclusive line range (`L5-L9`); end >= start
    LineRange(u32, u32),
    /// From a line to the end of the file (`L5-EOF`)
    LineToEof(u32),
    /// An inclusive byte-column range (`L5C20:L5C45`)
    ColumnRange {
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    },
}

impl PositionSpec {
    /// First line addressed by this spec (1-indexed).
    pub fn start_line(&self) -> u32 {
        match *self {
            PositionSpec::Line(n)
            | PositionSpec::LineRange(n, _)
            | PositionSpec::LineToEof(n)
            | PositionSpec::ColumnRange { start_line: n, .. } => n,
        }
    }
}

impl fmt::Display for PositionSpec {
    /// Canonical suffix form, without the leading `:`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PositionSpec::Line(n) => write!(f, "L{}", n),
            PositionSpec::LineRange(n, m) => write!(f, "L{}-L{}", n, m),
            PositionSpec::LineToEof(n) => write!(f, "L{}-EOF", n),
            PositionSpec::ColumnRange {
                start_line,
                start_col,
                end_line,
                end_col,
            } => write!(f, "L{}C{}:L{}C{}", start_line, start_col, end_line, end_col),
        }
    }
}

/// Split a raw mapping path into (file path, optional position spec).
///
/// Scans left-to-right for the first `:` immediately followed by `L` and a
/// digit; everything before is the file path. A suffix that matches the
/// trigger but none of the accepted shapes is a hard
/// [`VendoError::MalformedPositionSpec`], never silently treated as
/// "no position".
pub fn parse_path_position(raw: &str) -> VendoResult<(String, Option<PositionSpec>)> {
    let Some(at) = find_trigger(raw) else {
        return Ok((raw.to_string(), None));
    };

    let path = &raw[..at];
    let suffix = &raw[at + 1..];
    let spec = parse_spec(raw, suffix)?;
    Ok((path.to_string(), Some(spec)))
}

/// Return just the path part of a possibly position-suffixed string.
pub fn strip_position(raw: &str) -> VendoResult<String> {
    parse_path_position(raw).map(|(path, _)| path)
}

/// Re-attach a position spec to a path in canonical form.
///
/// `parse_path_position(format_path_position(p, Some(s)))` yields `(p, Some(s))`.
pub fn format_path_position(path: &str, spec: Option<&PositionSpec>) -> String {
    match spec {
        Some(spec) => format!("{}:{}", path, spec),
        None => path.to_string(),
    }
}

/// Find the byte offset of the first `:` that starts a `:L<digit>` trigger.
fn find_trigger(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b':' && bytes[i + 1] == b'L' && bytes[i + 2].is_ascii_digit() {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Parse the suffix after the trigger `:` (always starts with `L<digit>`).
fn parse_spec(raw: &str, suffix: &str) -> VendoResult<PositionSpec> {
    let mut cur = Cursor::new(raw, suffix);

    cur.expect(b'L')?;
    let start = cur.number()?;

    if cur.at_end() {
        return Ok(PositionSpec::Line(start));
    }

    match cur.peek() {
        Some(b'-') if cur.rest_after(1) == "EOF" => Ok(PositionSpec::LineToEof(start)),
        Some(b'-') | Some(b':') => {
            cur.bump();
            cur.expect(b'L')?;
            let end = cur.number()?;
            if !cur.at_end() {
                return Err(cur.malformed());
            }
            if end < start {
                return Err(cur.invalid(format!("end line {} before start line {}", end, start)));
            }
            Ok(PositionSpec::LineRange(start, end))
        }
        Some(b'C') => {
            cur.bump();
            let start_col = cur.number()?;
            cur.expect(b':')?;
            cur.expect(b'L')?;
            let end_line = cur.number()?;
            cur.expect(b'C')?;
            let end_col = cur.number()?;
            if !cur.at_end() {
                return Err(cur.malformed());
            }
            if end_line < start {
                return Err(cur.invalid(format!(
                    "end line {} before start line {}",
                    end_line, start
                )));
            }
            if end_line == start && end_col < start_col {
                return Err(cur.invalid(format!(
                    "end column {} before start column {} on line {}",
                    end_col, start_col, start
                )));
            }
            Ok(PositionSpec::ColumnRange {
                start_line: start,
                start_col,
                end_line,
                end_col,
            })
        }
        _ => Err(cur.malformed()),
    }
}

/// Byte cursor over a position suffix, carrying the full raw string for
/// error reporting.
struct Cursor<'a> {
    raw: &'a str,
    suffix: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(raw: &'a str, suffix: &'a str) -> Self {
        Self {
            raw,
            suffix: suffix.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.suffix.len()
    }

    fn peek(&self) -> Option<u8> {
        self.suffix.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn rest_after(&self, skip: usize) -> &str {
        let start = (self.pos + skip).min(self.suffix.len());
        // Suffix came from a &str and we only skip ASCII bytes.
        std::str::from_utf8(&self.suffix[start..]).unwrap_or("")
    }

    fn expect(&mut self, byte: u8) -> VendoResult<()> {
        if self.peek() == Some(byte) {
            self.bump();
            Ok(())
        } else {
            Err(self.malformed())
        }
    }

    /// Parse a 1-indexed decimal number. Zero is `InvalidPosition`, overflow
    /// is `InvalidPosition` rather than wrapping, no digits is malformed.
    fn number(&mut self) -> VendoResult<u32> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.malformed());
        }
        let digits = std::str::from_utf8(&self.suffix[start..self.pos]).unwrap_or("");
        let value: u32 = digits
            .parse()
            .map_err(|_| self.invalid(format!("number '{}' too large", digits)))?;
        if value == 0 {
            return Err(self.invalid("lines and columns are 1-indexed".to_string()));
        }
        Ok(value)
    }

    fn malformed(&self) -> VendoError {
        VendoError::MalformedPositionSpec {
            raw: self.raw.to_string(),
        }
    }

    fn invalid(&self, reason: String) -> VendoError {
        VendoError::InvalidPosition {
            raw: self.raw.to_string(),
            reason,
        }
    }
}
