//! Lazily materialized, read-only views over a token sub-slice.
//!
//! A node is nothing more than the tokens it covers plus the buffer they
//! point into. Collections resolve their children the first time they are
//! asked and keep every child node they hand out, so repeated lookups return
//! the same instance. Scalars convert their span on demand.
//!
//! Memoization uses [`OnceCell`](core::cell::OnceCell): a node is cheap to
//! create and is meant to be owned by one thread. Share the buffer and the
//! token list across threads and build a [`RootNode`] per thread instead.

use alloc::borrow::Cow;
use core::{
    cell::OnceCell,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::NodeError,
    source::CharSource,
    token::{Token, TokenKind},
};

/// Equality, hashing and display for the scalar node types, all defined over
/// the resolved span content.
macro_rules! span_identity {
    ($($ty:ident),+) => {$(
        impl PartialEq for $ty<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.node_type() == other.node_type() && self.as_bytes() == other.as_bytes()
            }
        }

        impl Eq for $ty<'_> {}

        impl core::hash::Hash for $ty<'_> {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                state.write_u64(self.span().hash_code());
            }
        }

        impl core::fmt::Display for $ty<'_> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.raw())
            }
        }
    )+};
}

mod array;
mod collection;
mod object;
mod root;
mod scalar;


pub use array::ArrayNode;
pub use object::ObjectNode;
pub use root::RootNode;
pub use scalar::{BooleanNode, NullNode, Number, NumberNode, StringNode};

/// The JSON type a node was built for.
///
/// Numbers are split by lexical form: a literal with a fraction or exponent is
/// a `Float`, anything else an `Int`, regardless of magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// A string.
    String,
    /// An integer literal.
    Int,
    /// A literal with a fraction or exponent.
    Float,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Object => "object",
            NodeType::Array => "array",
            NodeType::String => "string",
            NodeType::Int => "int",
            NodeType::Float => "float",
            NodeType::Boolean => "boolean",
            NodeType::Null => "null",
        };
        f.write_str(name)
    }
}

/// What every node needs besides its tokens.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Overlay<'a> {
    pub(crate) source: CharSource<'a>,
    pub(crate) encoded_keys: bool,
}

/// The token sub-slice a node covers. Never empty.
#[derive(Debug, Clone)]
pub(crate) struct Span<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) ctx: Overlay<'a>,
    hash: OnceCell<u64>,
}

impl<'a> Span<'a> {
    pub(crate) fn new(tokens: &'a [Token], ctx: Overlay<'a>) -> Self {
        debug_assert!(!tokens.is_empty());
        Self {
            tokens,
            ctx,
            hash: OnceCell::new(),
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> &'a Token {
        &self.tokens[0]
    }

    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.root().start_index()
    }

    #[inline]
    pub(crate) fn end(&self) -> usize {
        self.root().end_index()
    }

    #[inline]
    pub(crate) fn source(&self) -> &CharSource<'a> {
        &self.ctx.source
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &'a [u8] {
        self.ctx.source.slice(self.start(), self.end())
    }

    pub(crate) fn raw(&self) -> Cow<'a, str> {
        self.ctx.source.slice_to_str(self.start(), self.end())
    }

    /// Polynomial hash of the span bytes, computed once.
    pub(crate) fn hash_code(&self) -> u64 {
        self.hash_code_with(|| bytes_hash(self.as_bytes()))
    }

    /// The node's hash, computed once by `init`.
    pub(crate) fn hash_code_with(&self, init: impl FnOnce() -> u64) -> u64 {
        *self.hash.get_or_init(init)
    }
}

pub(crate) fn bytes_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |h, &b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// A typed view over one JSON value.
///
/// Use the `as_*` downcasts, or match on the variants, to reach the
/// variant-specific API.
///
/// ```rust
/// use jsonoverlay::{Document, NodeType, ParserOptions};
///
/// let doc = Document::parse(r#"[{"h":"a"}]"#, ParserOptions::default()).unwrap();
/// let root = doc.root();
/// let first = root.get_index(0).unwrap().unwrap();
/// assert_eq!(first.node_type(), NodeType::Object);
/// let h = first.as_object().unwrap().get("h").unwrap();
/// assert_eq!(h.as_string().unwrap().value().unwrap(), "a");
/// ```
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// An object.
    Object(ObjectNode<'a>),
    /// An array.
    Array(ArrayNode<'a>),
    /// A string.
    String(StringNode<'a>),
    /// A number, integer or not.
    Number(NumberNode<'a>),
    /// `true` or `false`.
    Boolean(BooleanNode<'a>),
    /// An explicit `null`.
    Null(NullNode<'a>),
}

macro_rules! downcast {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ident, $expected:expr) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns [`NodeError::WrongType`] for any other variant.
        pub fn $name(&self) -> Result<&$ty<'a>, NodeError> {
            match self {
                Node::$variant(node) => Ok(node),
                other => Err(NodeError::WrongType {
                    expected: $expected,
                    found: other.node_type(),
                }),
            }
        }
    };
}

impl<'a> Node<'a> {
    /// Builds the node `tokens[0]` implies.
    ///
    /// Attribute wrappers are looked through, so a slice handed out by the
    /// resolver for an object member yields the key or value itself. A
    /// wrapper with nothing inside becomes a `Null` over the wrapper's span.
    pub(crate) fn create(mut tokens: &'a [Token], ctx: Overlay<'a>) -> Self {
        let is_key = tokens[0].kind == TokenKind::AttributeKey;
        while matches!(tokens[0].kind, TokenKind::AttributeKey | TokenKind::AttributeValue) && tokens.len() > 1 {
            tokens = &tokens[1..];
        }

        let span = Span::new(tokens, ctx);
        match tokens[0].kind {
            TokenKind::Object => Node::Object(ObjectNode::new(span)),
            TokenKind::Array => Node::Array(ArrayNode::new(span)),
            TokenKind::String | TokenKind::PathKey => {
                Node::String(StringNode::new(span, !is_key || ctx.encoded_keys))
            }
            TokenKind::Int | TokenKind::PathIndex => Node::Number(NumberNode::new(span, false)),
            TokenKind::Float => Node::Number(NumberNode::new(span, true)),
            TokenKind::Boolean => Node::Boolean(BooleanNode::new(span)),
            TokenKind::Null | TokenKind::AttributeKey | TokenKind::AttributeValue => Node::Null(NullNode::new(span)),
        }
    }

    fn span(&self) -> &Span<'a> {
        match self {
            Node::Object(node) => node.span(),
            Node::Array(node) => node.span(),
            Node::String(node) => node.span(),
            Node::Number(node) => node.span(),
            Node::Boolean(node) => node.span(),
            Node::Null(node) => node.span(),
        }
    }

    /// The JSON type of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Object(_) => NodeType::Object,
            Node::Array(_) => NodeType::Array,
            Node::String(_) => NodeType::String,
            Node::Number(node) => node.node_type(),
            Node::Boolean(_) => NodeType::Boolean,
            Node::Null(_) => NodeType::Null,
        }
    }

    /// The tokens this node covers, its own token first.
    #[must_use]
    pub fn tokens(&self) -> &'a [Token] {
        self.span().tokens
    }

    /// The node's own token.
    #[must_use]
    pub fn root_token(&self) -> &'a Token {
        self.span().root()
    }

    /// Raw bytes of the node's span. Strings exclude their quotes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span().as_bytes()
    }

    /// Raw text of the node's span, escapes left as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span().raw()
    }

    /// Whether this is a string, number, boolean or null.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !self.is_collection()
    }

    /// Whether this is an object or an array.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Node::Object(_) | Node::Array(_))
    }

    /// Whether this is an explicit `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null(_))
    }

    downcast!(
        /// This node as an object.
        as_object, Object, ObjectNode, NodeType::Object
    );
    downcast!(
        /// This node as an array.
        as_array, Array, ArrayNode, NodeType::Array
    );
    downcast!(
        /// This node as a string.
        as_string, String, StringNode, NodeType::String
    );
    downcast!(
        /// This node as a number.
        as_number, Number, NumberNode, NodeType::Int
    );
    downcast!(
        /// This node as a boolean.
        as_boolean, Boolean, BooleanNode, NodeType::Boolean
    );
    downcast!(
        /// This node as a null.
        as_null, Null, NullNode, NodeType::Null
    );
}

impl Node<'_> {
    /// Hash consistent with `==`: scalars hash their bytes, collections
    /// combine the hashes of their members.
    pub(crate) fn hash_code(&self) -> u64 {
        match self {
            Node::Object(object) => object.hash_code(),
            Node::Array(array) => array.hash_code(),
            other => other.span().hash_code(),
        }
    }
}

/// Scalars are equal when their type and their text match. Arrays compare
/// element by element and objects member by member, so whitespace and key
/// order do not matter.
impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Object(a), Node::Object(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => a == b,
            _ => self.node_type() == other.node_type() && self.as_bytes() == other.as_bytes(),
        }
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}
