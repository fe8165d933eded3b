use alloc::{borrow::Cow, vec::Vec};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::{Node, NodeType, Span, collection::Members, scalar};
use crate::{
    error::NodeError,
    source::CharSource,
    token::{Token, TokenKind},
};

/// A JSON array.
///
/// Elements are resolved on first access and each element node is built at
/// most once. The `to_*_vec` helpers read numeric arrays straight from the
/// tokens without building a node per element.
#[derive(Debug, Clone)]
pub struct ArrayNode<'a> {
    members: Members<'a>,
}

impl<'a> ArrayNode<'a> {
    pub(crate) fn new(span: Span<'a>) -> Self {
        Self {
            members: Members::new(span),
        }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.members.span
    }

    /// Always [`NodeType::Array`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        NodeType::Array
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.children().len()
    }

    /// Whether the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`, or `None` past the end.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Node<'a>> {
        self.members.slot(index)
    }

    /// Elements in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Node<'a>> + '_ {
        (0..self.len()).filter_map(|i| self.members.slot(i))
    }

    fn collect_numbers<T>(
        &self,
        convert: impl Fn(&CharSource<'a>, &Token) -> Result<T, NodeError>,
    ) -> Result<Vec<T>, NodeError> {
        let span = self.span();
        self.members
            .children()
            .iter()
            .map(|&child| {
                let token = &child[0];
                match token.kind {
                    TokenKind::Int | TokenKind::Float => convert(span.source(), token),
                    _ => Err(NodeError::WrongType {
                        expected: NodeType::Int,
                        found: Node::create(child, span.ctx).node_type(),
                    }),
                }
            })
            .collect()
    }

    /// All elements as `i32`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element, otherwise as
    /// [`NumberNode::as_i32`](super::NumberNode::as_i32).
    pub fn to_i32_vec(&self) -> Result<Vec<i32>, NodeError> {
        self.collect_numbers(scalar::to_i32)
    }

    /// All elements as `i64`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element, otherwise as
    /// [`NumberNode::as_i64`](super::NumberNode::as_i64).
    pub fn to_i64_vec(&self) -> Result<Vec<i64>, NodeError> {
        self.collect_numbers(scalar::to_i64)
    }

    /// All elements as `f32`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element.
    pub fn to_f32_vec(&self) -> Result<Vec<f32>, NodeError> {
        self.collect_numbers(scalar::to_f32)
    }

    /// All elements as `f64`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>, NodeError> {
        self.collect_numbers(scalar::to_f64)
    }

    /// All elements as exact decimals.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element.
    pub fn to_decimal_vec(&self) -> Result<Vec<BigDecimal>, NodeError> {
        self.collect_numbers(scalar::to_decimal)
    }

    /// All elements as arbitrary precision integers, fractions truncated.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] for a non-numeric element.
    pub fn to_big_int_vec(&self) -> Result<Vec<BigInt>, NodeError> {
        self.collect_numbers(scalar::to_big_int)
    }

    /// The array as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span().raw()
    }

    /// Raw bytes of the array, brackets included.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span().as_bytes()
    }
}

impl ArrayNode<'_> {
    /// Element hashes folded in order, computed once.
    pub(crate) fn hash_code(&self) -> u64 {
        self.span().hash_code_with(|| {
            self.iter()
                .fold(self.len() as u64, |h, node| h.wrapping_mul(31).wrapping_add(node.hash_code()))
        })
    }
}

impl PartialEq for ArrayNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for ArrayNode<'_> {}

impl core::hash::Hash for ArrayNode<'_> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl core::fmt::Display for ArrayNode<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw())
    }
}
