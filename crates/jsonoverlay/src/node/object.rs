use alloc::{borrow::Cow, boxed::Box, collections::BTreeSet, vec::Vec};
use core::cell::OnceCell;

use super::{ArrayNode, Node, NodeType, Span, StringNode, bytes_hash, collection::Members};
use crate::{error::NodeError, token::TokenKind};

/// A JSON object.
///
/// Members are resolved on first access. Lookup compares keys against the
/// buffer without allocating, and each value node is built once and then
/// handed out by reference on every later lookup.
///
/// Duplicate keys are kept; [`get`](ObjectNode::get) returns the first.
#[derive(Debug, Clone)]
pub struct ObjectNode<'a> {
    members: Members<'a>,
    keys: OnceCell<Result<Box<[StringNode<'a>]>, NodeError>>,
}

impl<'a> ObjectNode<'a> {
    pub(crate) fn new(span: Span<'a>) -> Self {
        Self {
            members: Members::new(span),
            keys: OnceCell::new(),
        }
    }

    pub(crate) fn span(&self) -> &Span<'a> {
        &self.members.span
    }

    /// Always [`NodeType::Object`].
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        NodeType::Object
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.children().len() / 2
    }

    /// Whether the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the value slot for `key`.
    fn find(&self, key: &str) -> Option<usize> {
        let span = self.span();
        let source = span.source();
        let children = self.members.children();

        (0..children.len() / 2).find_map(|i| {
            let name = children[2 * i].get(1).filter(|t| t.kind == TokenKind::String)?;
            let (start, end) = (name.start_index(), name.end_index());
            let hit = if span.ctx.encoded_keys && source.has_escape(start, end) {
                match self.keys() {
                    Ok(keys) => keys[i].value().is_ok_and(|decoded| decoded == key),
                    Err(_) => source
                        .slice_to_decoded_str(start, end)
                        .is_ok_and(|decoded| decoded == key),
                }
            } else {
                source.match_chars(start, end, key)
            };
            hit.then_some(2 * i + 1)
        })
    }

    /// The value stored under `key`, or `None` when there is no such member.
    ///
    /// An explicit `null` is returned as [`Node::Null`], never as `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node<'a>> {
        self.find(key).and_then(|slot| self.members.slot(slot))
    }

    /// Whether a member named `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Member keys in document order, computed once.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NonStringKey`] when a key token is not a string.
    pub fn keys(&self) -> Result<&[StringNode<'a>], NodeError> {
        self.keys
            .get_or_init(|| {
                let span = self.span();
                self.members
                    .children()
                    .iter()
                    .step_by(2)
                    .map(|&key| match key.get(1..) {
                        Some(inner @ [name, ..]) if name.kind == TokenKind::String => {
                            Ok(StringNode::new(Span::new(inner, span.ctx), span.ctx.encoded_keys))
                        }
                        Some([other, ..]) => Err(NodeError::NonStringKey { kind: other.kind }),
                        _ => Err(NodeError::NonStringKey { kind: key[0].kind }),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Vec::into_boxed_slice)
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    #[cfg(test)]
    pub(crate) fn keys_resolved(&self) -> bool {
        self.keys.get().is_some()
    }

    /// Members in document order. Members whose key is not a string are
    /// skipped.
    pub fn entries(&self) -> impl Iterator<Item = (&StringNode<'a>, &Node<'a>)> + '_ {
        (0..self.len()).filter_map(|i| {
            let Node::String(key) = self.members.slot(2 * i)? else {
                return None;
            };
            Some((key, self.members.slot(2 * i + 1)?))
        })
    }

    /// Values in document order.
    pub fn values(&self) -> impl Iterator<Item = &Node<'a>> + '_ {
        (0..self.len()).filter_map(|i| self.members.slot(2 * i + 1))
    }

    /// The string under `key`, decoded.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not a string, or
    /// [`NodeError::Malformed`] for a bad escape.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, NodeError> {
        self.get(key).map(|node| node.as_string()?.value()).transpose()
    }

    /// The string under `key` as written, escapes included.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not a string.
    pub fn get_raw_str(&self, key: &str) -> Result<Option<Cow<'a, str>>, NodeError> {
        self.get(key).map(|node| Ok(node.as_string()?.raw())).transpose()
    }

    /// The integer under `key`.
    ///
    /// # Errors
    ///
    /// See [`NumberNode::as_i32`](super::NumberNode::as_i32).
    pub fn get_i32(&self, key: &str) -> Result<Option<i32>, NodeError> {
        self.get(key).map(|node| node.as_number()?.as_i32()).transpose()
    }

    /// The integer under `key`.
    ///
    /// # Errors
    ///
    /// See [`NumberNode::as_i64`](super::NumberNode::as_i64).
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, NodeError> {
        self.get(key).map(|node| node.as_number()?.as_i64()).transpose()
    }

    /// The number under `key` as `f64`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not a number.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, NodeError> {
        self.get(key).map(|node| node.as_number()?.as_f64()).transpose()
    }

    /// The boolean under `key`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not a boolean.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, NodeError> {
        self.get(key).map(|node| Ok(node.as_boolean()?.value())).transpose()
    }

    /// The object under `key`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not an object.
    pub fn get_object(&self, key: &str) -> Result<Option<&ObjectNode<'a>>, NodeError> {
        self.get(key).map(Node::as_object).transpose()
    }

    /// The array under `key`.
    ///
    /// # Errors
    ///
    /// [`NodeError::WrongType`] when the member is not an array.
    pub fn get_array(&self, key: &str) -> Result<Option<&ArrayNode<'a>>, NodeError> {
        self.get(key).map(Node::as_array).transpose()
    }

    /// The object as written.
    #[must_use]
    pub fn raw(&self) -> Cow<'a, str> {
        self.span().raw()
    }

    /// Raw bytes of the object, braces included.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.span().as_bytes()
    }
}

impl ObjectNode<'_> {
    /// Every key as text, or `None` when one of them cannot be read.
    fn key_texts(&self) -> Option<Vec<&str>> {
        self.keys().ok()?.iter().map(|key| key.value().ok()).collect()
    }

    /// Order independent sum over distinct keys of the key and the value it
    /// looks up, computed once.
    pub(crate) fn hash_code(&self) -> u64 {
        self.span().hash_code_with(|| {
            let Some(keys) = self.key_texts() else {
                return bytes_hash(self.as_bytes());
            };
            let mut seen = BTreeSet::new();
            keys.into_iter()
                .filter(|key| seen.insert(*key))
                .fold(self.len() as u64, |h, key| {
                    let value = self.get(key).map_or(0, Node::hash_code);
                    h.wrapping_add(bytes_hash(key.as_bytes()).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ value)
                })
        })
    }
}

/// Objects are equal when they have as many members and every key looks up
/// equal values in both, whatever the order or spacing.
impl PartialEq for ObjectNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        match (self.key_texts(), other.key_texts()) {
            (Some(mine), Some(theirs)) => mine
                .into_iter()
                .chain(theirs)
                .all(|key| self.get(key) == other.get(key)),
            _ => self.as_bytes() == other.as_bytes(),
        }
    }
}

impl Eq for ObjectNode<'_> {}

impl core::hash::Hash for ObjectNode<'_> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl core::fmt::Display for ObjectNode<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw())
    }
}
