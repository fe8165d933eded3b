//! Reconstructs hierarchy from the flat token list.
//!
//! Containment is the only structure stored: a token belongs to a container
//! exactly when it starts inside the container's span. Walking forward from
//! the container and skipping each nested container's descendants in one run
//! yields the immediate children without touching anything deeper.

use alloc::vec::Vec;

use crate::token::Token;

/// Iterator over the immediate children of `tokens[0]`.
///
/// Each item is the child's own sub-slice: a scalar child is a single token,
/// a container child is the container followed by all of its descendants.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tokens: &'a [Token],
    next: usize,
    limit: u32,
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a [Token];

    fn next(&mut self) -> Option<&'a [Token]> {
        let first = self.next;
        let token = self.tokens.get(first).filter(|t| t.start < self.limit)?;

        let mut end = first + 1;
        if token.kind.is_container() {
            while end < self.tokens.len() && self.tokens[end].start < token.end {
                end += 1;
            }
        }
        self.next = end;
        Some(&self.tokens[first..end])
    }
}

/// Walks the immediate children of the container at `tokens[0]`.
///
/// For an object the children alternate between attribute-key and
/// attribute-value wrappers, so child `2 * i` is the `i`-th key and
/// `2 * i + 1` its value. An empty slice has no children.
#[must_use]
pub fn children(tokens: &[Token]) -> Children<'_> {
    Children {
        tokens,
        next: 1,
        limit: tokens.first().map_or(0, |root| root.end),
    }
}

/// Collects [`children`] into a vector.
#[must_use]
pub fn child_tokens(tokens: &[Token]) -> Vec<&[Token]> {
    children(tokens).collect()
}
