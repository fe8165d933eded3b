use super::{ArrayNode, Node, NodeType, ObjectNode, Overlay};
use crate::{
    error::{NodeError, PathError},
    options::ParserOptions,
    path,
    source::CharSource,
    token::{Token, TokenKind},
};

/// The entry point into a scanned document.
///
/// Holds the node the first token implies. When that node is a container,
/// key and index lookups go straight to it, so its memoized children serve
/// every query.
#[derive(Debug, Clone)]
pub struct RootNode<'a> {
    tokens: &'a [Token],
    source: CharSource<'a>,
    node: Node<'a>,
}

impl<'a> RootNode<'a> {
    /// Wraps a token list scanned from `source`.
    ///
    /// # Errors
    ///
    /// [`NodeError::Empty`] for an empty list, and
    /// [`NodeError::MissingInner`] when an attribute wrapper is not directly
    /// followed by the token it wraps.
    pub fn new(tokens: &'a [Token], source: CharSource<'a>, options: ParserOptions) -> Result<Self, NodeError> {
        if tokens.is_empty() {
            return Err(NodeError::Empty);
        }
        let is_wrapper = |kind: TokenKind| matches!(kind, TokenKind::AttributeKey | TokenKind::AttributeValue);
        for (index, wrapper) in tokens.iter().enumerate() {
            if !is_wrapper(wrapper.kind) {
                continue;
            }
            let wrapped = tokens
                .get(index + 1)
                .is_some_and(|inner| !is_wrapper(inner.kind) && wrapper.contains(inner));
            if !wrapped {
                return Err(NodeError::MissingInner {
                    kind: wrapper.kind,
                    index,
                });
            }
        }
        Ok(Self::trusted(tokens, source, options))
    }

    /// Wraps tokens that came straight from the scanner.
    pub(crate) fn trusted(tokens: &'a [Token], source: CharSource<'a>, options: ParserOptions) -> Self {
        let ctx = Overlay {
            source,
            encoded_keys: options.objects_keys_can_be_encoded,
        };
        Self {
            tokens,
            source,
            node: Node::create(tokens, ctx),
        }
    }

    /// The document's top-level node.
    #[must_use]
    pub fn node(&self) -> &Node<'a> {
        &self.node
    }

    /// The top-level node's type.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node.node_type()
    }

    /// Every token of the document.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    /// The buffer the tokens point into.
    #[must_use]
    pub fn source(&self) -> CharSource<'a> {
        self.source
    }

    /// The top-level node as an object.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the document is not an object.
    pub fn as_object(&self) -> Result<&ObjectNode<'a>, NodeError> {
        self.node.as_object()
    }

    /// The top-level node as an array.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the document is not an array.
    pub fn as_array(&self) -> Result<&ArrayNode<'a>, NodeError> {
        self.node.as_array()
    }

    /// Looks up `key` in the top-level object.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the document is not an object.
    pub fn get(&self, key: &str) -> Result<Option<&Node<'a>>, NodeError> {
        Ok(self.as_object()?.get(key))
    }

    /// Looks up `index` in the top-level array.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the document is not an array.
    pub fn get_index(&self, index: usize) -> Result<Option<&Node<'a>>, NodeError> {
        Ok(self.as_array()?.get_index(index))
    }

    /// Follows `path` from the top-level node.
    ///
    /// # Errors
    ///
    /// See [`at_path`](crate::at_path).
    pub fn at_path(&self, path: &str) -> Result<&Node<'a>, PathError> {
        path::at_path(&self.node, path)
    }
}
