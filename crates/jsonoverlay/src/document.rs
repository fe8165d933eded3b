use alloc::vec::Vec;

use crate::{
    error::ParseError,
    node::RootNode,
    options::ParserOptions,
    parser::JsonParser,
    source::CharSource,
    token::TokenList,
};

/// A scanned document that owns its buffer and token list.
///
/// Nodes borrow both, so they are handed out through [`Document::root`].
///
/// ```rust
/// use jsonoverlay::{Document, ParserOptions};
///
/// let doc = Document::parse(r#"{"a":1,"b":2}"#, ParserOptions::default()).unwrap();
/// let root = doc.root();
/// let a = root.get("a").unwrap().unwrap();
/// assert_eq!(a.as_number().unwrap().as_i32().unwrap(), 1);
/// assert!(root.get("c").unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    tokens: TokenList,
    options: ParserOptions,
}

impl Document {
    /// Scans `bytes` into a document.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found.
    pub fn parse(bytes: impl Into<Vec<u8>>, options: ParserOptions) -> Result<Self, ParseError> {
        let bytes = bytes.into();
        let tokens = JsonParser::new(options).scan(CharSource::new(&bytes))?;
        Ok(Self { bytes, tokens, options })
    }

    /// A fresh root over the document.
    ///
    /// Each call starts with empty memo tables; keep the returned root around
    /// to benefit from them.
    #[must_use]
    pub fn root(&self) -> RootNode<'_> {
        RootNode::trusted(&self.tokens, self.source(), self.options)
    }

    /// The document's buffer.
    #[must_use]
    pub fn source(&self) -> CharSource<'_> {
        CharSource::new(&self.bytes)
    }

    /// The document's tokens.
    #[must_use]
    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// The options the document was scanned with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The document's bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
