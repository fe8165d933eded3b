//! Scanner: a cursor over a [`CharSource`] that finds where lexical units end.
//!
//! What it does
//! - Tracks the current byte offset. `peek()` looks at the byte under the
//!   cursor, `bump()` steps over it.
//! - Skips whitespace, and the comment styles enabled in [`ParserOptions`].
//! - Finds the end of strings, numbers and the `true`/`false`/`null`
//!   literals, enforcing the JSON grammar for each, and locates the
//!   separators that follow values inside arrays and objects.
//!
//! Scope
//! - The scanner knows nothing about nesting or tokens. The parser decides
//!   what to scan next and what to record; the scanner reports offsets.
//!
//! Invariants
//! - Every `find_*` method expects the cursor on the unit's first byte.
//! - On success the cursor is left on the first byte after the unit; for the
//!   separator searches it is left on the separator itself.
//! - Every failure is a [`ParseError`] pointing at the offending byte, or at
//!   the end of input when the input runs out.

use crate::{
    error::ParseError,
    options::ParserOptions,
    source::{CharSource, is_hex_digit},
};


/// Which comment styles count as whitespace.
#[derive(Debug, Clone, Copy, Default)]
struct Comments {
    any: bool,
    hash: bool,
    slash_slash: bool,
    slash_star: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    source: CharSource<'a>,
    bytes: &'a [u8],
    index: usize,
    comments: Comments,
}

#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: CharSource<'a>, options: &ParserOptions) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            index: 0,
            comments: Comments {
                any: options.allows_comments(),
                hash: options.allow_hash_comments,
                slash_slash: options.allow_slash_slash_comments,
                slash_star: options.allow_slash_star_comments,
            },
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.index += 1;
    }

    /// Error at the cursor.
    pub(crate) fn error(&self, phase: &'static str, message: &'static str) -> ParseError {
        self.error_at(phase, message, self.index)
    }

    pub(crate) fn error_at(&self, phase: &'static str, message: &'static str, index: usize) -> ParseError {
        ParseError::at(phase, message, &self.source, index)
    }

    // ------------------------------------------------------------------------------------------------
    // Whitespace and comments
    // ------------------------------------------------------------------------------------------------

    /// Advances past whitespace and enabled comments, returning the next
    /// significant byte without consuming it, or `None` at end of input.
    pub(crate) fn skip_whitespace(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            let Some(b) = self.peek() else {
                return Ok(None);
            };
            match b {
                b if is_ws(b) => self.index += 1,
                b'#' if self.comments.hash => self.skip_line(),
                b'/' => match self.bytes.get(self.index + 1) {
                    Some(b'/') if self.comments.slash_slash => self.skip_line(),
                    Some(b'*') if self.comments.slash_star => self.skip_block_comment()?,
                    _ => return Ok(Some(b)),
                },
                _ => return Ok(Some(b)),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.peek() {
            self.index += 1;
            if b == b'\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let opened = self.index;
        let mut i = self.index + 2;
        while i + 1 < self.bytes.len() {
            if self.bytes[i] == b'*' && self.bytes[i + 1] == b'/' {
                self.index = i + 2;
                return Ok(());
            }
            i += 1;
        }
        Err(self.error_at("Skipping comment", "Unterminated block comment", opened))
    }

    /// Whether an enabled comment opens at `i`.
    #[inline]
    fn comment_at(&self, i: usize) -> bool {
        self.comments.any
            && match self.bytes.get(i) {
                Some(b'#') => self.comments.hash,
                Some(b'/') => match self.bytes.get(i + 1) {
                    Some(b'/') => self.comments.slash_slash,
                    Some(b'*') => self.comments.slash_star,
                    _ => false,
                },
                _ => false,
            }
    }

    /// Whether the byte at `i` may directly follow a number literal.
    #[inline]
    fn ends_value_at(&self, i: usize) -> bool {
        match self.bytes.get(i) {
            None | Some(b',' | b']' | b'}' | b':') => true,
            Some(&b) => is_ws(b) || self.comment_at(i),
        }
    }

    /// Fails unless only whitespace (and enabled comments) remains.
    pub(crate) fn check_for_junk(&mut self) -> Result<(), ParseError> {
        match self.skip_whitespace()? {
            None => Ok(()),
            Some(_) => Err(self.error("Checking for trailing content", "Unexpected extra characters")),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------------------------------

    /// Finds the closing quote of a string that may contain escapes.
    ///
    /// Expects the cursor on the opening quote. Returns the offset of the
    /// closing quote and leaves the cursor just past it.
    pub(crate) fn find_end_of_encoded_string(&mut self) -> Result<usize, ParseError> {
        const PHASE: &str = "Parsing JSON string";
        let mut i = self.index + 1;
        while let Some(&b) = self.bytes.get(i) {
            match b {
                b'"' => {
                    self.index = i + 1;
                    return Ok(i);
                }
                b'\\' => {
                    match self.bytes.get(i + 1) {
                        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => i += 2,
                        Some(b'u') => {
                            for j in i + 2..i + 6 {
                                match self.bytes.get(j) {
                                    Some(&h) if is_hex_digit(h) => {}
                                    Some(_) => {
                                        return Err(self.error_at(PHASE, "Invalid hex digit in unicode escape", j));
                                    }
                                    None => {
                                        return Err(self.error_at(PHASE, "Unable to find closing for String", j));
                                    }
                                }
                            }
                            i += 6;
                        }
                        Some(_) => return Err(self.error_at(PHASE, "Invalid escape character", i + 1)),
                        None => return Err(self.error_at(PHASE, "Unable to find closing for String", i + 1)),
                    }
                }
                b if b < 0x20 => {
                    return Err(self.error_at(PHASE, "Control character in string", i));
                }
                _ => i += 1,
            }
        }
        Err(self.error_at(PHASE, "Unable to find closing for String", i))
    }

    /// Finds the closing quote of a string, treating backslashes literally.
    ///
    /// Expects the cursor on the opening quote. Returns the offset of the
    /// closing quote and leaves the cursor just past it.
    pub(crate) fn find_end_of_string(&mut self) -> Result<usize, ParseError> {
        const PHASE: &str = "Parsing JSON string";
        let mut i = self.index + 1;
        while let Some(&b) = self.bytes.get(i) {
            if b == b'"' {
                self.index = i + 1;
                return Ok(i);
            }
            if b < 0x20 {
                return Err(self.error_at(PHASE, "Control character in string", i));
            }
            i += 1;
        }
        Err(self.error_at(PHASE, "Unable to find closing for String", i))
    }

    /// Finds the end of an unquoted object key.
    ///
    /// The key runs until whitespace, an enabled comment, `:` or a structural
    /// character. Leaves the cursor on that terminator and returns its offset.
    pub(crate) fn find_attribute_end(&mut self) -> usize {
        while let Some(b) = self.peek() {
            let structural = matches!(b, b':' | b',' | b'{' | b'}' | b'[' | b']' | b'"');
            if is_ws(b) || structural || self.comment_at(self.index) {
                break;
            }
            self.index += 1;
        }
        self.index
    }

    // ------------------------------------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------------------------------------

    #[inline]
    fn skip_digits(&self, mut i: usize) -> usize {
        while self.bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    }

    #[inline]
    fn is_digit_at(&self, i: usize) -> bool {
        self.bytes.get(i).is_some_and(u8::is_ascii_digit)
    }

    /// Finds the end of a number literal.
    ///
    /// Returns the end offset and whether the literal has a fraction or an
    /// exponent. Enforces the JSON number grammar: no leading `+`, no leading
    /// zeros, a digit after `-`, after `.` and after the exponent marker (and
    /// its optional sign).
    pub(crate) fn find_end_of_number(&mut self) -> Result<(usize, bool), ParseError> {
        const PHASE: &str = "Parsing JSON number";
        let start = self.index;
        let mut i = start;

        match self.bytes.get(i) {
            Some(b'+') => return Err(self.error_at(PHASE, "Number can't start with a plus", i)),
            Some(b'-') => {
                i += 1;
                if !self.is_digit_at(i) {
                    return Err(self.error_at(PHASE, "Minus sign must be followed by a digit", i));
                }
            }
            _ => {}
        }

        if self.bytes.get(i) == Some(&b'0') {
            i += 1;
            if self.is_digit_at(i) {
                let message = if i - start == 1 {
                    "Number can't start with a 0"
                } else {
                    "0 can't follow a minus sign"
                };
                return Err(self.error_at(PHASE, message, start));
            }
        } else if self.is_digit_at(i) {
            i = self.skip_digits(i);
        } else {
            return Err(self.error_at(PHASE, "Unexpected character", i));
        }

        let mut is_float = false;

        if self.bytes.get(i) == Some(&b'.') {
            i += 1;
            if !self.is_digit_at(i) {
                return Err(self.error_at(PHASE, "After decimal point expecting number", i));
            }
            i = self.skip_digits(i);
            is_float = true;
        }

        if matches!(self.bytes.get(i), Some(b'e' | b'E')) {
            i += 1;
            if matches!(self.bytes.get(i), Some(b'+' | b'-')) {
                i += 1;
                if !self.is_digit_at(i) {
                    return Err(self.error_at(PHASE, "After exponent sign expecting number", i));
                }
            } else if !self.is_digit_at(i) {
                return Err(self.error_at(PHASE, "After exponent expecting number or sign", i));
            }
            i = self.skip_digits(i);
            is_float = true;
        }

        if !self.ends_value_at(i) {
            return Err(self.error_at(PHASE, "Unexpected character", i));
        }

        self.index = i;
        Ok((i, is_float))
    }

    // ------------------------------------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------------------------------------

    fn find_literal_end(&mut self, literal: &[u8], phase: &'static str) -> Result<usize, ParseError> {
        for (offset, &expected) in literal.iter().enumerate() {
            if self.bytes.get(self.index + offset) != Some(&expected) {
                return Err(self.error_at(phase, "Unexpected character", self.index + offset));
            }
        }
        self.index += literal.len();
        Ok(self.index)
    }

    pub(crate) fn find_true_end(&mut self) -> Result<usize, ParseError> {
        self.find_literal_end(b"true", "Parsing JSON true boolean")
    }

    pub(crate) fn find_false_end(&mut self) -> Result<usize, ParseError> {
        self.find_literal_end(b"false", "Parsing JSON false boolean")
    }

    pub(crate) fn find_null_end(&mut self) -> Result<usize, ParseError> {
        self.find_literal_end(b"null", "Parsing JSON null")
    }

    // ------------------------------------------------------------------------------------------------
    // Separators
    // ------------------------------------------------------------------------------------------------

    /// After an array item: `true` at `]`, `false` at `,`.
    pub(crate) fn find_comma_or_array_end(&mut self) -> Result<bool, ParseError> {
        match self.skip_whitespace()? {
            Some(b']') => Ok(true),
            Some(b',') => Ok(false),
            Some(_) => Err(self.error("Parsing array", "Expected ',' or ']' after array item")),
            None => Err(self.error("Parsing array", "Unterminated array")),
        }
    }

    /// After an object key: `true` at `}`, `false` at `:`.
    pub(crate) fn find_colon_or_object_end(&mut self) -> Result<bool, ParseError> {
        match self.skip_whitespace()? {
            Some(b'}') => Ok(true),
            Some(b':') => Ok(false),
            Some(_) => Err(self.error("Parsing object key", "Expected ':' after object key")),
            None => Err(self.error("Parsing object key", "Unterminated object")),
        }
    }

    /// After an object value: `true` at `}`, `false` at `,`.
    pub(crate) fn find_comma_or_object_end(&mut self) -> Result<bool, ParseError> {
        match self.skip_whitespace()? {
            Some(b'}') => Ok(true),
            Some(b',') => Ok(false),
            Some(_) => Err(self.error("Parsing object value", "Expected ',' or '}' after object value")),
            None => Err(self.error("Parsing object value", "Unterminated object")),
        }
    }
}
