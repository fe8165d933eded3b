use alloc::{boxed::Box, vec::Vec};
use core::cell::OnceCell;

use super::{Node, Span};
use crate::{resolver, token::Token};

/// Children and child-node memo shared by objects and arrays.
///
/// Slot `i` holds the node built for child `i` the first time it is asked
/// for. For objects the slots alternate key, value.
#[derive(Debug, Clone)]
pub(crate) struct Members<'a> {
    pub(crate) span: Span<'a>,
    children: OnceCell<Vec<&'a [Token]>>,
    slots: OnceCell<Box<[OnceCell<Node<'a>>]>>,
}

impl<'a> Members<'a> {
    pub(crate) fn new(span: Span<'a>) -> Self {
        Self {
            span,
            children: OnceCell::new(),
            slots: OnceCell::new(),
        }
    }

    /// Immediate children as token sub-slices, resolved once.
    pub(crate) fn children(&self) -> &[&'a [Token]] {
        self.children.get_or_init(|| {
            let children = resolver::child_tokens(self.span.tokens);
            log::trace!("resolved {} children of {}", children.len(), self.span.root());
            children
        })
    }

    /// The memoized node for child `index`.
    pub(crate) fn slot(&self, index: usize) -> Option<&Node<'a>> {
        let children = self.children();
        let child = *children.get(index)?;
        let slots = self
            .slots
            .get_or_init(|| (0..children.len()).map(|_| OnceCell::new()).collect());
        Some(slots[index].get_or_init(|| Node::create(child, self.span.ctx)))
    }
}
