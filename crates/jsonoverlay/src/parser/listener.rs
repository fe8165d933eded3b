use crate::token::{TokenKind, TokenList};

/// Observer of the token stream while a document is being scanned.
///
/// The scanner calls [`start`](TokenEventListener::start) when a token's span
/// opens and [`end`](TokenEventListener::end) when it closes, so containers
/// bracket the events of everything they contain. Scalars open and close
/// back to back. Positions are byte offsets into the source.
pub trait TokenEventListener {
    /// A token of `kind` begins at `index`.
    fn start(&mut self, kind: TokenKind, index: usize);

    /// The innermost open token, of `kind`, ends just before `index`.
    fn end(&mut self, kind: TokenKind, index: usize);
}

impl TokenEventListener for () {
    #[inline]
    fn start(&mut self, _kind: TokenKind, _index: usize) {}

    #[inline]
    fn end(&mut self, _kind: TokenKind, _index: usize) {}
}

impl<L: TokenEventListener + ?Sized> TokenEventListener for &mut L {
    #[inline]
    fn start(&mut self, kind: TokenKind, index: usize) {
        (**self).start(kind, index);
    }

    #[inline]
    fn end(&mut self, kind: TokenKind, index: usize) {
        (**self).end(kind, index);
    }
}

/// Builds a [`TokenList`] from scanner events.
///
/// Each `start` reserves a placeholder and remembers its slot; the matching
/// `end` fills in the end offset. Tokens therefore land in the order they
/// open, which is the order the node layer walks them in.
#[derive(Debug, Default)]
pub(crate) struct TokenCollector {
    tokens: TokenList,
    open: alloc::vec::Vec<usize>,
}

impl TokenCollector {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: TokenList::with_capacity(capacity),
            open: alloc::vec::Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> TokenList {
        debug_assert!(self.open.is_empty(), "unclosed tokens: {:?}", self.open);
        self.tokens
    }
}

impl TokenEventListener for TokenCollector {
    #[inline]
    fn start(&mut self, kind: TokenKind, index: usize) {
        let slot = self.tokens.placeholder(kind, index);
        self.open.push(slot);
    }

    #[inline]
    fn end(&mut self, kind: TokenKind, index: usize) {
        if let Some(slot) = self.open.pop() {
            debug_assert_eq!(self.tokens[slot].kind, kind);
            #[cfg(any(test, feature = "fuzzing"))]
            assert!(
                self.tokens[slot].start_index() <= index,
                "Internal error: {} closed at {index}",
                self.tokens[slot]
            );
            self.tokens.close(slot, index);
        }
    }
}

/// Collects tokens while forwarding every event to a caller's listener.
pub(crate) struct Tee<'l, L: ?Sized> {
    pub(crate) collector: TokenCollector,
    pub(crate) inner: &'l mut L,
}

impl<L: TokenEventListener + ?Sized> TokenEventListener for Tee<'_, L> {
    #[inline]
    fn start(&mut self, kind: TokenKind, index: usize) {
        self.collector.start(kind, index);
        self.inner.start(kind, index);
    }

    #[inline]
    fn end(&mut self, kind: TokenKind, index: usize) {
        self.collector.end(kind, index);
        self.inner.end(kind, index);
    }
}
