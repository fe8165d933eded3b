//! A small path language for reaching into a document.
//!
//! ```text
//! store.book[0].title
//! ['key with spaces'][2]
//! ```
//!
//! A path is scanned into [`TokenKind::PathKey`] and [`TokenKind::PathIndex`]
//! tokens over the path text, the same way a document is scanned into value
//! tokens. Walking a path only uses the public node accessors.

use alloc::string::{String, ToString};
use core::fmt;

use crate::{
    error::{ParseError, PathError},
    node::Node,
    source::CharSource,
    token::{Token, TokenKind, TokenList},
};

/// One step of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElement<'p> {
    /// Look up a key in an object.
    Key(&'p str),
    /// Look up a position in an array.
    Index(usize),
}

impl fmt::Display for PathElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Key(key) => f.write_str(key),
            PathElement::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl<'p> From<&'p str> for PathElement<'p> {
    fn from(key: &'p str) -> Self {
        PathElement::Key(key)
    }
}

impl From<usize> for PathElement<'_> {
    fn from(index: usize) -> Self {
        PathElement::Index(index)
    }
}

/// Tokenizer for path expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParser;

const PHASE: &str = "Parsing path";

#[inline]
fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'$')
}

impl PathParser {
    /// Scans `path` into key and index tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] pointing at the first byte that does not fit
    /// the path grammar.
    pub fn scan(path: &str) -> Result<TokenList, ParseError> {
        let source = CharSource::from(path);
        let bytes = path.as_bytes();
        let error = |message, index| ParseError::at(PHASE, message, &source, index);

        let mut tokens = TokenList::new();
        let mut i = 0;
        while let Some(&b) = bytes.get(i) {
            match b {
                b'.' => i = Self::key(bytes, i + 1, &mut tokens).map_err(|at| error("Key must start with a letter", at))?,
                b'[' => match bytes.get(i + 1) {
                    Some(b'0'..=b'9') => {
                        let start = i + 1;
                        let mut end = start;
                        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                            end += 1;
                        }
                        if bytes.get(end) != Some(&b']') {
                            return Err(error("Expected ']' after index", end));
                        }
                        if path[start..end].parse::<usize>().is_err() {
                            return Err(error("Index is too large", start));
                        }
                        tokens.push(token(start, end, TokenKind::PathIndex));
                        i = end + 1;
                    }
                    Some(b'\'') => {
                        let start = i + 2;
                        let Some(close) = bytes[start.min(bytes.len())..].iter().position(|&c| c == b'\'') else {
                            return Err(error("Unterminated quoted key", bytes.len()));
                        };
                        let end = start + close;
                        if bytes.get(end + 1) != Some(&b']') {
                            return Err(error("Expected ']' after quoted key", end + 1));
                        }
                        tokens.push(token(start, end, TokenKind::PathKey));
                        i = end + 2;
                    }
                    _ => return Err(error("Expected index or quoted key", i + 1)),
                },
                _ if i == 0 => i = Self::key(bytes, 0, &mut tokens).map_err(|at| error("Key must start with a letter", at))?,
                _ => return Err(error("Expected '.' or '['", i)),
            }
        }

        log::trace!("scanned path {path:?} into {} steps", tokens.len());
        Ok(tokens)
    }

    /// Scans a bare key starting at `start`; returns where it ends.
    fn key(bytes: &[u8], start: usize, tokens: &mut TokenList) -> Result<usize, usize> {
        if !bytes.get(start).is_some_and(u8::is_ascii_alphabetic) {
            return Err(start);
        }
        let mut end = start + 1;
        while bytes.get(end).copied().is_some_and(is_key_byte) {
            end += 1;
        }
        tokens.push(token(start, end, TokenKind::PathKey));
        Ok(end)
    }
}

fn token(start: usize, end: usize, kind: TokenKind) -> Token {
    Token::new(crate::token::offset(start), crate::token::offset(end), kind)
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    text: String,
    tokens: TokenList,
}

impl Path {
    /// Parses `text` as a path.
    ///
    /// # Errors
    ///
    /// See [`PathParser::scan`].
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: PathParser::scan(text)?,
            text: text.to_string(),
        })
    }

    /// The path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The path's tokens.
    #[must_use]
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the path has no steps and so names the starting node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The steps in order.
    pub fn elements(&self) -> impl Iterator<Item = PathElement<'_>> + '_ {
        self.tokens.iter().map(|t| {
            let text = self.text.get(t.start_index()..t.end_index()).unwrap_or_default();
            match t.kind {
                TokenKind::PathIndex => PathElement::Index(text.parse().unwrap_or(usize::MAX)),
                _ => PathElement::Key(text),
            }
        })
    }

    /// Walks the path from `node`.
    ///
    /// # Errors
    ///
    /// [`PathError::NotFound`] at the first step that names a missing key or
    /// index, or that does not fit the shape of the node it is applied to.
    pub fn follow<'n, 'a>(&self, node: &'n Node<'a>) -> Result<&'n Node<'a>, PathError> {
        let mut current = node;
        for (position, element) in self.elements().enumerate() {
            let next = match (element, current) {
                (PathElement::Key(key), Node::Object(object)) => object.get(key),
                (PathElement::Index(index), Node::Array(array)) => array.get_index(index),
                _ => None,
            };
            current = next.ok_or_else(|| PathError::NotFound {
                element: element.to_string(),
                position,
            })?;
        }
        Ok(current)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parses `path` and walks it from `node`.
///
/// ```rust
/// use jsonoverlay::{Document, ParserOptions, at_path};
///
/// let doc = Document::parse(r#"{"a":[{"b":true}]}"#, ParserOptions::default()).unwrap();
/// let root = doc.root();
/// let b = at_path(root.node(), "a[0].b").unwrap();
/// assert!(b.as_boolean().unwrap().value());
/// ```
///
/// # Errors
///
/// [`PathError::Syntax`] for a malformed path, otherwise see
/// [`Path::follow`].
pub fn at_path<'n, 'a>(node: &'n Node<'a>, path: &str) -> Result<&'n Node<'a>, PathError> {
    Path::parse(path)?.follow(node)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use rstest::rstest;

    use super::*;

    fn steps(path: &Path) -> Vec<PathElement<'_>> {
        path.elements().collect()
    }

    #[test]
    fn keys_indices_and_quoted_keys() {
        let path = Path::parse("store.book[12]['a b.c'].x_1-$").unwrap();
        assert_eq!(
            steps(&path),
            [
                PathElement::Key("store"),
                PathElement::Key("book"),
                PathElement::Index(12),
                PathElement::Key("a b.c"),
                PathElement::Key("x_1-$"),
            ]
        );
        assert_eq!(path.tokens()[2], Token::new(11, 13, TokenKind::PathIndex));
    }

    #[test]
    fn leading_dot_and_empty_path() {
        assert_eq!(steps(&Path::parse(".a").unwrap()), [PathElement::Key("a")]);
        assert_eq!(steps(&Path::parse("[0][1]").unwrap()), [PathElement::Index(0), PathElement::Index(1)]);
        assert!(Path::parse("").unwrap().is_empty());
    }

    #[rstest]
    #[case("1a", "Key must start with a letter", 0)]
    #[case("a..b", "Key must start with a letter", 2)]
    #[case("a[x]", "Expected index or quoted key", 2)]
    #[case("a[1", "Expected ']' after index", 3)]
    #[case("a['k'", "Expected ']' after quoted key", 5)]
    #[case("a['k", "Unterminated quoted key", 4)]
    #[case("a b", "Expected '.' or '['", 1)]
    #[case("[99999999999999999999999]", "Index is too large", 1)]
    fn malformed_paths(#[case] text: &str, #[case] message: &str, #[case] index: usize) {
        let err = PathParser::scan(text).unwrap_err();
        assert_eq!(err.message(), message);
        assert_eq!(err.index(), index);
    }
}
