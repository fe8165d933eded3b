//! Scalar nodes. Each converts its own span on demand and never copies the
//! buffer unless decoding requires it.

use alloc::borrow::Cow;
use core::{cell::OnceCell, fmt};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::{NodeType, Span};
use crate::{
    error::NodeError,
    source::CharSource,
    token::{Token, TokenKind},
};

// ------------------------------------------------------------------------------------------------
// Strings
// ------------------------------------------------------------------------------------------------

/// A string value or object key. The span excludes the quotes.
#[derive(Debug, Clone)]
pub struct StringNode<'a> {
    span: Span<'a>,
    decode: bool,
    decoded: OnceCell<Result<Cow<'a, str>, NodeError>>,
}

impl<'a> StringNode<'a> {
    pub(crate) fn new(span: Span<'a>, decode: bool) -> Self {
        Self {
            span,
            decode,
            decoded: OnceCell::new(),
        }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.span
    }

    /// Always [`NodeType::String`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        NodeType::String
    }

    /// The string with its escapes decoded, computed once.
    ///
    /// Strings without a backslash are borrowed straight from the buffer.
    /// Keys scanned without escape support are returned as written.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::Malformed`] for an invalid escape sequence.
    pub fn value(&self) -> Result<&str, NodeError> {
        self.decoded
            .get_or_init(|| {
                if self.decode {
                    self.span
                        .source()
                        .slice_to_decoded_str(self.span.start(), self.span.end())
                        .map_err(NodeError::from)
                } else {
                    Ok(self.span.raw())
                }
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    /// The string as written, escapes included.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span.raw()
    }

    /// Raw bytes between the quotes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span.as_bytes()
    }

    /// Length of the raw span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.span.root().len()
    }

    /// Whether the string is `""`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.span.root().is_empty()
    }

    /// The character starting at raw byte offset `index`, or `None` past the
    /// end.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        self.span.source().char_at(self.span.start() + index)
    }

    /// Whether the raw span starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.as_bytes().starts_with(prefix.as_bytes())
    }
}

// ------------------------------------------------------------------------------------------------
// Numbers
// ------------------------------------------------------------------------------------------------

/// The value of a number literal in its narrowest lossless representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An integer literal that fits in `i32`.
    Int(i32),
    /// An integer literal that fits in `i64` but not `i32`.
    Long(i64),
    /// An integer literal too large for `i64`.
    BigInt(BigInt),
    /// A literal with a fraction or exponent.
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::BigInt(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

pub(crate) fn to_i32(source: &CharSource<'_>, token: &Token) -> Result<i32, NodeError> {
    let (start, end) = (token.start_index(), token.end_index());
    if token.kind == TokenKind::Float {
        return Err(NodeError::NotAnInteger);
    }
    if !source.is_integer(start, end) {
        return Err(NodeError::OutOfRange { target: "i32" });
    }
    Ok(source.slice_to_i32(start, end)?)
}

pub(crate) fn to_i64(source: &CharSource<'_>, token: &Token) -> Result<i64, NodeError> {
    let (start, end) = (token.start_index(), token.end_index());
    if token.kind == TokenKind::Float {
        return Err(NodeError::NotAnInteger);
    }
    if !source.is_long(start, end) {
        return Err(NodeError::OutOfRange { target: "i64" });
    }
    Ok(source.slice_to_i64(start, end)?)
}

pub(crate) fn to_f32(source: &CharSource<'_>, token: &Token) -> Result<f32, NodeError> {
    Ok(source.slice_to_f32(token.start_index(), token.end_index())?)
}

pub(crate) fn to_f64(source: &CharSource<'_>, token: &Token) -> Result<f64, NodeError> {
    Ok(source.slice_to_f64(token.start_index(), token.end_index())?)
}

pub(crate) fn to_decimal(source: &CharSource<'_>, token: &Token) -> Result<BigDecimal, NodeError> {
    Ok(source.slice_to_decimal(token.start_index(), token.end_index())?)
}

pub(crate) fn to_big_int(source: &CharSource<'_>, token: &Token) -> Result<BigInt, NodeError> {
    Ok(source.slice_to_big_int(token.start_index(), token.end_index())?)
}

/// A number literal.
///
/// The literal's lexical form decides which conversions are exact: an `Int`
/// converts to any integer type it fits, a `Float` only to floating point
/// and decimal.
#[derive(Debug, Clone)]
pub struct NumberNode<'a> {
    span: Span<'a>,
    float: bool,
}

impl<'a> NumberNode<'a> {
    pub(crate) fn new(span: Span<'a>, float: bool) -> Self {
        Self { span, float }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.span
    }

    /// [`NodeType::Float`] for a literal with a fraction or exponent,
    /// [`NodeType::Int`] otherwise.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        if self.float { NodeType::Float } else { NodeType::Int }
    }

    /// Whether the literal has a fraction or exponent.
    #[must_use]
    pub fn is_float(&self) -> bool {
        self.float
    }

    /// Whether the literal is an integer that fits in `i32`.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        !self.float && self.span.source().is_integer(self.span.start(), self.span.end())
    }

    /// Whether the literal is an integer that fits in `i64`.
    #[must_use]
    pub fn is_long(&self) -> bool {
        !self.float && self.span.source().is_long(self.span.start(), self.span.end())
    }

    fn token(&self) -> Token {
        // Path indices carry no sign or fraction and convert like integers.
        Token {
            kind: if self.float { TokenKind::Float } else { TokenKind::Int },
            ..*self.span.root()
        }
    }

    /// The literal as `i32`.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotAnInteger`] for a `Float` literal,
    /// [`NodeError::OutOfRange`] when the value does not fit.
    pub fn as_i32(&self) -> Result<i32, NodeError> {
        to_i32(self.span.source(), &self.token())
    }

    /// The literal as `i64`.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotAnInteger`] for a `Float` literal,
    /// [`NodeError::OutOfRange`] when the value does not fit.
    pub fn as_i64(&self) -> Result<i64, NodeError> {
        to_i64(self.span.source(), &self.token())
    }

    /// The literal as `f32`, rounded to nearest.
    ///
    /// # Errors
    ///
    /// [`NodeError::Malformed`] when the span is not a number literal.
    pub fn as_f32(&self) -> Result<f32, NodeError> {
        to_f32(self.span.source(), &self.token())
    }

    /// The literal as `f64`, rounded to nearest. The sign of zero is kept.
    ///
    /// # Errors
    ///
    /// [`NodeError::Malformed`] when the span is not a number literal.
    pub fn as_f64(&self) -> Result<f64, NodeError> {
        to_f64(self.span.source(), &self.token())
    }

    /// The literal as an exact decimal.
    ///
    /// # Errors
    ///
    /// [`NodeError::Malformed`] when the span is not a number literal.
    pub fn as_decimal(&self) -> Result<BigDecimal, NodeError> {
        to_decimal(self.span.source(), &self.token())
    }

    /// The literal as an arbitrary precision integer, truncating any fraction.
    ///
    /// # Errors
    ///
    /// [`NodeError::Malformed`] when the span is not a number literal.
    pub fn as_big_int(&self) -> Result<BigInt, NodeError> {
        to_big_int(self.span.source(), &self.token())
    }

    /// The value in its narrowest lossless representation.
    ///
    /// # Errors
    ///
    /// [`NodeError::Malformed`] when the span is not a number literal.
    pub fn value(&self) -> Result<Number, NodeError> {
        if self.float {
            self.as_f64().map(Number::Float)
        } else if self.is_integer() {
            self.as_i32().map(Number::Int)
        } else if self.is_long() {
            self.as_i64().map(Number::Long)
        } else {
            self.as_big_int().map(Number::BigInt)
        }
    }

    /// The literal as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span.raw()
    }

    /// Raw bytes of the literal.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span.as_bytes()
    }
}

// ------------------------------------------------------------------------------------------------
// Literals
// ------------------------------------------------------------------------------------------------

/// `true` or `false`.
#[derive(Debug, Clone)]
pub struct BooleanNode<'a> {
    span: Span<'a>,
}

impl<'a> BooleanNode<'a> {
    pub(crate) fn new(span: Span<'a>) -> Self {
        Self { span }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.span
    }

    /// Always [`NodeType::Boolean`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        NodeType::Boolean
    }

    /// The boolean value.
    #[must_use]
    pub fn value(&self) -> bool {
        self.as_bytes().first() == Some(&b't')
    }

    /// The literal as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span.raw()
    }

    /// Raw bytes of the literal.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span.as_bytes()
    }
}

/// An explicit `null`, as opposed to a missing key or index.
#[derive(Debug, Clone)]
pub struct NullNode<'a> {
    span: Span<'a>,
}

impl<'a> NullNode<'a> {
    pub(crate) fn new(span: Span<'a>) -> Self {
        Self { span }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.span
    }

    /// Always [`NodeType::Null`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        NodeType::Null
    }

    /// The literal as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span.raw()
    }

    /// Raw bytes of the literal.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span.as_bytes()
    }
}

span_identity!(StringNode, NumberNode, BooleanNode, NullNode);
