//! Decoding of JSON backslash escapes.
//!
//! The [`UnicodeEscapeBuffer`] type accumulates exactly four ASCII hexadecimal
//! digits (`0-9`, `A-F`, `a-f`) into a UTF-16 code unit. Pairing code units
//! into characters is left to [`decode_json_string`], which also handles the
//! single-letter escapes.
//!
//! # Errors
//!
//! - A non-hexadecimal digit inside `\uXXXX` is rejected.
//! - A high surrogate must be immediately followed by an escaped low
//!   surrogate; a lone low surrogate is rejected too.
//! - An escape letter outside `" \ / b f n r t u` is rejected.

use alloc::string::String;

use bstr::ByteSlice;

use super::CharSource;
use crate::error::ParseError;

const PHASE: &str = "Decoding JSON string";

/// Result of feeding one byte into a [`UnicodeEscapeBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Fewer than four digits so far.
    NeedMore,
    /// Four digits accumulated into this code unit; the buffer is reset.
    Done(u16),
    /// The byte is not a hexadecimal digit.
    Reject,
}

/// Accumulates four hexadecimal digits into a UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    /// Feeds a single byte.
    ///
    /// A rejected byte leaves the buffer reset.
    pub(crate) fn feed(&mut self, b: u8) -> Step {
        let Some(d) = hex_val(b) else {
            self.reset();
            return Step::Reject;
        };

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Step::NeedMore;
        }

        let unit = self.acc;
        self.reset();
        Step::Done(unit)
    }
}

/// Convert a single ASCII hex digit into its 0..=15 value.
#[inline]
fn hex_val(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
        _ => None,
    }
}

#[inline]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    hex_val(b).is_some()
}

/// Reads the four digits of a `\u` escape starting at span offset `at`.
///
/// Returns the code unit and the span offset just past it.
fn read_unit(source: &CharSource<'_>, span: &[u8], start: usize, at: usize) -> Result<(u16, usize), ParseError> {
    let mut buf = UnicodeEscapeBuffer::new();
    for i in at..at + 4 {
        let Some(&b) = span.get(i) else {
            return Err(ParseError::with_char(
                PHASE,
                "Unterminated unicode escape",
                source,
                start + i,
                None,
            ));
        };
        match buf.feed(b) {
            Step::NeedMore => {}
            Step::Done(unit) => return Ok((unit, i + 1)),
            Step::Reject => {
                return Err(ParseError::at(
                    PHASE,
                    "Invalid hex digit in unicode escape",
                    source,
                    start + i,
                ));
            }
        }
    }
    Err(ParseError::at(PHASE, "Unterminated unicode escape", source, start + at))
}

/// Decodes the escapes in `[start, end)` of `source` into an owned string.
pub(crate) fn decode_json_string(source: &CharSource<'_>, start: usize, end: usize) -> Result<String, ParseError> {
    let span = source.slice(start, end);
    let mut out = String::with_capacity(span.len());
    let mut run = 0;
    let mut i = 0;

    while let Some(offset) = span[i..].find_byte(b'\\') {
        let slash = i + offset;
        out.push_str(&span[run..slash].to_str_lossy());

        let Some(&letter) = span.get(slash + 1) else {
            return Err(ParseError::with_char(
                PHASE,
                "Unterminated escape sequence",
                source,
                start + slash + 1,
                None,
            ));
        };
        i = slash + 2;

        let ch = match letter {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let (unit, next) = read_unit(source, span, start, i)?;
                i = next;
                match unit {
                    0xD800..=0xDBFF => {
                        if span.get(i) != Some(&b'\\') || span.get(i + 1) != Some(&b'u') {
                            return Err(ParseError::at(
                                PHASE,
                                "High surrogate is not followed by a low surrogate",
                                source,
                                start + slash,
                            ));
                        }
                        let (low, next) = read_unit(source, span, start, i + 2)?;
                        if !(0xDC00..=0xDFFF).contains(&low) {
                            return Err(ParseError::at(
                                PHASE,
                                "High surrogate is not followed by a low surrogate",
                                source,
                                start + i,
                            ));
                        }
                        i = next;
                        let code = 0x1_0000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                        char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
                    }
                    0xDC00..=0xDFFF => {
                        return Err(ParseError::at(
                            PHASE,
                            "Low surrogate without a preceding high surrogate",
                            source,
                            start + slash,
                        ));
                    }
                    unit => char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
                }
            }
            _ => {
                return Err(ParseError::at(
                    PHASE,
                    "Invalid escape character",
                    source,
                    start + slash + 1,
                ));
            }
        };
        out.push(ch);
        run = i;
    }

    out.push_str(&span[run..].to_str_lossy());
    Ok(out)
}
