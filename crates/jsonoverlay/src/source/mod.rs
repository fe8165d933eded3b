//! Read-only access to the buffer every token and node points into.
//!
//! A [`CharSource`] is a cheap, copyable view over a byte buffer. It can cover
//! the whole buffer or a window inside it; in both cases callers address it
//! with logical, zero-based offsets and the window's base is applied
//! internally. Tokens produced from a windowed source therefore stay valid
//! against that same window, and re-parsing a located substring never copies
//! it.
//!
//! Besides raw access the source converts spans directly into values:
//! strings (with a no-escape fast path), integers by digit accumulation,
//! floating point through a short fast path, and arbitrary precision numbers.

use alloc::{borrow::Cow, string::String};
use core::fmt;

use bigdecimal::BigDecimal;
use bstr::ByteSlice;
use num_bigint::BigInt;

use crate::error::ParseError;

mod escape;
mod numbers;

#[cfg(test)]
mod tests;

pub(crate) use escape::is_hex_digit;

/// An immutable buffer shared by a token list and every node built from it.
#[derive(Clone, Copy)]
pub struct CharSource<'a> {
    window: &'a [u8],
    base: usize,
}

impl<'a> CharSource<'a> {
    /// Creates a source over the whole buffer.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            window: data,
            base: 0,
        }
    }

    /// Creates a source over `data[start..end]`.
    ///
    /// Offsets used with the returned source are relative to `start`.
    /// Returns `None` when the range does not lie inside `data`.
    #[must_use]
    pub fn window(data: &'a [u8], start: usize, end: usize) -> Option<Self> {
        data.get(start..end).map(|window| Self {
            window,
            base: start,
        })
    }

    /// Number of bytes visible through this source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Whether the source is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Offset of this source's first byte in the underlying buffer.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    /// The visible bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.window
    }

    /// Byte at logical offset `index`.
    #[inline]
    #[must_use]
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.window.get(index).copied()
    }

    /// Character starting at logical offset `index`.
    ///
    /// Invalid UTF-8 decodes to U+FFFD. Returns `None` past the end.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        let rest = self.window.get(index..).filter(|rest| !rest.is_empty())?;
        let (ch, _) = bstr::decode_utf8(rest);
        Some(ch.unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Raw bytes of `[start, end)`; empty when the range is out of bounds.
    #[inline]
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        self.window.get(start..end).unwrap_or_default()
    }

    /// Raw text of `[start, end)`, borrowed whenever it is valid UTF-8.
    #[must_use]
    pub fn slice_to_str(&self, start: usize, end: usize) -> Cow<'a, str> {
        self.slice(start, end).to_str_lossy()
    }

    /// Whether `[start, end)` contains a backslash escape.
    #[inline]
    #[must_use]
    pub fn has_escape(&self, start: usize, end: usize) -> bool {
        self.slice(start, end).find_byte(b'\\').is_some()
    }

    /// Text of `[start, end)` with JSON escapes decoded.
    ///
    /// Spans without a backslash are returned borrowed without decoding.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for an invalid escape letter, a malformed
    /// `\uXXXX` sequence or an unpaired surrogate.
    pub fn slice_to_decoded_str(&self, start: usize, end: usize) -> Result<Cow<'a, str>, ParseError> {
        if self.has_escape(start, end) {
            escape::decode_json_string(self, start, end).map(Cow::Owned)
        } else {
            Ok(self.slice_to_str(start, end))
        }
    }

    /// Decodes `[start, end)` unconditionally, skipping the escape check.
    ///
    /// # Errors
    ///
    /// See [`CharSource::slice_to_decoded_str`].
    pub fn slice_to_decoded_string(&self, start: usize, end: usize) -> Result<String, ParseError> {
        escape::decode_json_string(self, start, end)
    }

    /// Compares `[start, end)` against `key` without allocating.
    ///
    /// Object key lookup funnels through here, so short keys are compared with
    /// straight-line code and long keys check their ends and middle before the
    /// rest.
    #[must_use]
    pub fn match_chars(&self, start: usize, end: usize, key: &str) -> bool {
        let Some(span) = self.window.get(start..end) else {
            return false;
        };
        let key = key.as_bytes();
        if span.len() != key.len() {
            return false;
        }

        macro_rules! unrolled {
            ($($i:literal)+) => { $( span[$i] == key[$i] )&&+ };
        }

        match key.len() {
            0 => true,
            1 => unrolled!(0),
            2 => unrolled!(0 1),
            3 => unrolled!(0 1 2),
            4 => unrolled!(0 1 2 3),
            5 => unrolled!(0 1 2 3 4),
            6 => unrolled!(0 1 2 3 4 5),
            7 => unrolled!(0 1 2 3 4 5 6),
            8 => unrolled!(0 1 2 3 4 5 6 7),
            9 => unrolled!(0 1 2 3 4 5 6 7 8),
            10 => unrolled!(0 1 2 3 4 5 6 7 8 9),
            11 => unrolled!(0 1 2 3 4 5 6 7 8 9 10),
            12 => unrolled!(0 1 2 3 4 5 6 7 8 9 10 11),
            len => {
                let last = len - 1;
                let mid = len / 2;
                span[0] == key[0]
                    && span[last] == key[last]
                    && span[mid] == key[mid]
                    && span[1..last] == key[1..last]
            }
        }
    }

    /// Whether the integer literal at `[start, end)` fits in an `i32`.
    ///
    /// Decided by comparing digit strings, never by converting.
    #[must_use]
    pub fn is_integer(&self, start: usize, end: usize) -> bool {
        numbers::fits(self.slice(start, end), numbers::MIN_INT, numbers::MAX_INT)
    }

    /// Whether the integer literal at `[start, end)` fits in an `i64`.
    #[must_use]
    pub fn is_long(&self, start: usize, end: usize) -> bool {
        numbers::fits(self.slice(start, end), numbers::MIN_LONG, numbers::MAX_LONG)
    }

    /// Parses `[start, end)` as an `i32` by digit accumulation.
    ///
    /// Overflow wraps; check [`CharSource::is_integer`] first.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first byte that is not a digit.
    pub fn slice_to_i32(&self, start: usize, end: usize) -> Result<i32, ParseError> {
        numbers::parse_i32(self.slice(start, end)).map_err(|at| self.number_error(start + at))
    }

    /// Parses `[start, end)` as an `i64` by digit accumulation.
    ///
    /// Overflow wraps; check [`CharSource::is_long`] first.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first byte that is not a digit.
    pub fn slice_to_i64(&self, start: usize, end: usize) -> Result<i64, ParseError> {
        numbers::parse_i64(self.slice(start, end)).map_err(|at| self.number_error(start + at))
    }

    /// Parses `[start, end)` as an `f64`, preserving the sign of zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the span is not a number literal.
    pub fn slice_to_f64(&self, start: usize, end: usize) -> Result<f64, ParseError> {
        numbers::parse_f64(self.slice(start, end)).ok_or_else(|| self.number_error(start))
    }

    /// Parses `[start, end)` as an `f32`, preserving the sign of zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the span is not a number literal.
    pub fn slice_to_f32(&self, start: usize, end: usize) -> Result<f32, ParseError> {
        numbers::parse_f32(self.slice(start, end)).ok_or_else(|| self.number_error(start))
    }

    /// Parses `[start, end)` as an arbitrary precision decimal.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the span is not a number literal.
    pub fn slice_to_decimal(&self, start: usize, end: usize) -> Result<BigDecimal, ParseError> {
        numbers::parse_decimal(self.slice(start, end)).ok_or_else(|| self.number_error(start))
    }

    /// Parses `[start, end)` as an arbitrary precision integer.
    ///
    /// Literals that fit an `i64` go through [`CharSource::slice_to_i64`];
    /// fractional or exponent literals are truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the span is not a number literal.
    pub fn slice_to_big_int(&self, start: usize, end: usize) -> Result<BigInt, ParseError> {
        let digits = self.slice(start, end);
        if numbers::is_plain_integer(digits) && self.is_long(start, end) {
            return self.slice_to_i64(start, end).map(BigInt::from);
        }
        numbers::parse_big_int(digits).ok_or_else(|| self.number_error(start))
    }

    fn number_error(&self, index: usize) -> ParseError {
        ParseError::at("Converting number", "Invalid number literal", self, index)
    }

    /// 1-based line number of `index` and the offset its line starts at.
    pub(crate) fn line_of(&self, index: usize) -> (usize, usize) {
        let head = &self.window[..index.min(self.window.len())];
        let line = head.iter().filter(|&&b| b == b'\n').count() + 1;
        let start = head.rfind_byte(b'\n').map_or(0, |nl| nl + 1);
        (line, start)
    }

    /// Text of the line beginning at `line_start`, without its newline.
    pub(crate) fn line_text(&self, line_start: usize) -> Cow<'a, str> {
        let rest = self.window.get(line_start..).unwrap_or_default();
        let end = rest.find_byte(b'\n').unwrap_or(rest.len());
        rest[..end].to_str_lossy()
    }
}

impl<'a> From<&'a str> for CharSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for CharSource<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for CharSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharSource")
            .field("base", &self.base)
            .field("text", &self.window.as_bstr())
            .finish()
    }
}
