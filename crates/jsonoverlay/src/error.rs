//! Error types for scanning, node access and path queries.
//!
//! Structural problems in the input are always reported as a [`ParseError`],
//! which pins the failure to a byte offset together with the line and column
//! it falls on. Misuse of the node API (a wrong-variant downcast, a numeric
//! conversion that cannot be honored) is reported as a [`NodeError`].

use alloc::{format, string::String};
use core::fmt::Write;

use thiserror::Error;

use crate::{node::NodeType, source::CharSource, token::TokenKind};

/// An unexpected character was found while scanning or converting a span.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unexpected character while {phase}: {message}, found {} at {line}:{column}",
    describe_char(*.ch)
)]
pub struct ParseError {
    pub(crate) phase: &'static str,
    pub(crate) message: &'static str,
    pub(crate) ch: Option<char>,
    pub(crate) index: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl ParseError {
    /// Builds an error anchored at `index` in `source`, reading the offending
    /// character from the buffer.
    pub(crate) fn at(
        phase: &'static str,
        message: &'static str,
        source: &CharSource<'_>,
        index: usize,
    ) -> Self {
        let ch = source.char_at(index);
        Self::with_char(phase, message, source, index, ch)
    }

    /// Like [`ParseError::at`] but with an explicitly supplied character.
    pub(crate) fn with_char(
        phase: &'static str,
        message: &'static str,
        source: &CharSource<'_>,
        index: usize,
        ch: Option<char>,
    ) -> Self {
        let (line, line_start) = source.line_of(index);
        Self {
            phase,
            message,
            ch,
            index,
            line,
            column: index.saturating_sub(line_start) + 1,
        }
    }

    /// What the scanner was doing when it failed.
    #[must_use]
    pub fn phase(&self) -> &'static str {
        self.phase
    }

    /// Human description of the failure.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// The offending character, or `None` at end of input.
    #[must_use]
    pub fn ch(&self) -> Option<char> {
        self.ch
    }

    /// Logical byte offset of the failure.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based line number of the failure.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based byte column of the failure.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Renders a line-anchored excerpt of `source` around the failure.
    ///
    /// `source` must be the buffer the error was produced from.
    ///
    /// ```text
    /// Expected ':' after object key
    ///
    /// The current character read is '}' with an int value of 125
    /// line number 2
    /// index number 8
    ///   "a" }
    /// ......^
    /// ```
    #[must_use]
    pub fn render(&self, source: &CharSource<'_>) -> String {
        let mut out = String::with_capacity(256);
        let (_, line_start) = source.line_of(self.index);
        let line_text = source.line_text(line_start);

        let _ = writeln!(out, "{}", self.message);
        out.push('\n');
        let _ = writeln!(out, "The current character read is {}", describe_char(self.ch));
        let _ = writeln!(out, "line number {}", self.line);
        let _ = writeln!(out, "index number {}", self.index);
        let _ = writeln!(out, "{line_text}");
        for _ in line_start..self.index {
            out.push('.');
        }
        out.push('^');
        out
    }
}

/// Describes a character for error messages, spelling out invisible ones.
pub(crate) fn describe_char(ch: Option<char>) -> String {
    match ch {
        None => String::from("ETX"),
        Some(c) => {
            let shown = match c {
                ' ' => String::from("[SPACE]"),
                '\t' => String::from("[TAB]"),
                '\n' => String::from("[NEWLINE]"),
                '\r' => String::from("[RETURN]"),
                c => format!("'{c}'"),
            };
            format!("{shown} with an int value of {}", u32::from(c))
        }
    }
}

/// Misuse of the node API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A checked downcast asked for the wrong node variant.
    #[error("expected {expected:?} node but found {found:?}")]
    WrongType {
        /// Variant the caller asked for.
        expected: NodeType,
        /// Variant actually present.
        found: NodeType,
    },
    /// An object key token was not a string.
    #[error("object key must be a string token, found {kind:?}")]
    NonStringKey {
        /// Kind of the offending key token.
        kind: TokenKind,
    },
    /// An integer conversion was requested for a fractional or exponent literal.
    #[error("number is not an integer literal")]
    NotAnInteger,
    /// An integer literal does not fit the requested width.
    #[error("number does not fit in {target}")]
    OutOfRange {
        /// Name of the requested type.
        target: &'static str,
    },
    /// A node was requested from an empty token list.
    #[error("token list is empty")]
    Empty,
    /// A wrapper token has no inner value token.
    #[error("{kind:?} token at {index} has no inner token")]
    MissingInner {
        /// Kind of the wrapper.
        kind: TokenKind,
        /// Position of the wrapper in the token list.
        index: usize,
    },
    /// The span's content could not be converted.
    #[error(transparent)]
    Malformed(#[from] ParseError),
}

/// A path query could not be followed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path expression itself is malformed.
    #[error("invalid path: {0}")]
    Syntax(#[from] ParseError),
    /// A step named a key or index the document does not have, or stepped
    /// into a value of the wrong shape.
    #[error("path step {position} ({element}) not found")]
    NotFound {
        /// The step as written, for example `name` or `[3]`.
        element: String,
        /// Zero-based position of the step in the path.
        position: usize,
    },
}
