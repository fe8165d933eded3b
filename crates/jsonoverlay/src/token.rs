//! Flat span records describing a scanned document.

use alloc::vec::Vec;
use core::{fmt, ops::Deref};

/// Kind of syntactic unit a [`Token`] spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{ ... }`, brackets included.
    Object,
    /// `[ ... ]`, brackets included.
    Array,
    /// A number literal without fraction or exponent.
    Int,
    /// A number literal with a fraction or exponent.
    Float,
    /// String content, quotes excluded.
    String,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// Wraps an object key: from the key's first character to the `:`.
    AttributeKey,
    /// Wraps an object value: from its first character to the following `,`
    /// or `}`.
    AttributeValue,
    /// A key step in a path expression.
    PathKey,
    /// An index step in a path expression.
    PathIndex,
}

impl TokenKind {
    /// Whether tokens of this kind enclose other tokens.
    #[inline]
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(
            self,
            TokenKind::Object | TokenKind::Array | TokenKind::AttributeKey | TokenKind::AttributeValue
        )
    }
}

/// A half-open byte span `[start, end)` of the shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// First byte of the span.
    pub start: u32,
    /// One past the last byte of the span.
    pub end: u32,
    /// What the span holds.
    pub kind: TokenKind,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub const fn new(start: u32, end: u32, kind: TokenKind) -> Self {
        Self { start, end, kind }
    }

    /// `start` as a buffer offset.
    #[inline]
    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start as usize
    }

    /// `end` as a buffer offset.
    #[inline]
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.end as usize
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// Whether the span is empty (an empty string, for example).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies within this token's span.
    #[must_use]
    pub fn contains(&self, other: &Token) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}..{})", self.kind, self.start, self.end)
    }
}

/// Converts a buffer offset into a token offset.
///
/// Sources longer than `u32::MAX` bytes are rejected before scanning starts.
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub(crate) fn offset(index: usize) -> u32 {
    index as u32
}

/// Ordered tokens of one scan, in the order their spans open.
///
/// The list is append-only while scanning and read-only afterwards; nodes
/// borrow sub-slices of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` tokens.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
        }
    }

    /// Appends a complete token.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Reserves a slot for a token whose end is not known yet and returns its
    /// position.
    pub fn placeholder(&mut self, kind: TokenKind, start: usize) -> usize {
        let slot = self.tokens.len();
        self.tokens.push(Token::new(offset(start), offset(start), kind));
        slot
    }

    /// Completes the placeholder at `slot`.
    pub fn close(&mut self, slot: usize, end: usize) {
        if let Some(token) = self.tokens.get_mut(slot) {
            token.end = offset(end);
        }
    }

    /// The tokens as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Consumes the list, returning its tokens.
    #[must_use]
    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }
}

impl Deref for TokenList {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = core::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
