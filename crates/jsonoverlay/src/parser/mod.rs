//! Grammar driver that turns a [`CharSource`] into a [`TokenList`].
//!
//! The driver walks the document once, asking the [`Scanner`] where each
//! lexical unit ends and reporting every token through a
//! [`TokenEventListener`]. The token list itself is produced by a listener,
//! so scanning with or without an extra listener attached runs the exact same
//! code.

use alloc::vec::Vec;

use crate::{
    error::{NodeError, ParseError},
    node::RootNode,
    options::ParserOptions,
    source::CharSource,
    token::{TokenKind, TokenList},
};

mod listener;
pub(crate) mod scanner;


pub use listener::TokenEventListener;
use listener::{Tee, TokenCollector};
use scanner::Scanner;

/// Scans JSON text into an index overlay.
///
/// ```rust
/// use jsonoverlay::{CharSource, JsonParser, ParserOptions};
///
/// let source = CharSource::from(r#"{"a":1,"b":[true,null]}"#);
/// let parser = JsonParser::new(ParserOptions::default());
/// let tokens = parser.scan(source).unwrap();
/// let root = parser.parse(&tokens, source).unwrap();
/// assert_eq!(root.as_object().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser {
    options: ParserOptions,
}

impl JsonParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// The options this parser was built with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Scans `source` into a token list.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found.
    pub fn scan(&self, source: CharSource<'_>) -> Result<TokenList, ParseError> {
        let mut collector = TokenCollector::with_capacity(source.len() / 8);
        self.drive(source, &mut collector)?;
        let tokens = collector.finish();
        log::trace!("collected {} tokens", tokens.len());
        Ok(tokens)
    }

    /// Scans `source` into a token list, forwarding every token event to
    /// `listener` as well.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found. Events already delivered to
    /// `listener` are not retracted.
    pub fn scan_with_listener<L: TokenEventListener + ?Sized>(
        &self,
        source: CharSource<'_>,
        listener: &mut L,
    ) -> Result<TokenList, ParseError> {
        let mut tee = Tee {
            collector: TokenCollector::with_capacity(source.len() / 8),
            inner: listener,
        };
        self.drive(source, &mut tee)?;
        Ok(tee.collector.finish())
    }

    /// Scans `source`, delivering token events to `listener` without building
    /// a token list.
    ///
    /// # Errors
    ///
    /// Returns the first structural error found.
    pub fn scan_events<L: TokenEventListener + ?Sized>(
        &self,
        source: CharSource<'_>,
        listener: &mut L,
    ) -> Result<(), ParseError> {
        self.drive(source, listener)
    }

    /// Wraps a scanned token list in a [`RootNode`].
    ///
    /// # Errors
    ///
    /// Fails when `tokens` is empty or malformed.
    pub fn parse<'a>(&self, tokens: &'a TokenList, source: CharSource<'a>) -> Result<RootNode<'a>, NodeError> {
        RootNode::new(tokens, source, self.options)
    }

    fn drive<L: TokenEventListener + ?Sized>(&self, source: CharSource<'_>, listener: &mut L) -> Result<(), ParseError> {
        log::trace!("scanning {} bytes with {:?}", source.len(), self.options);

        let result = Driver {
            scanner: Scanner::new(source, &self.options),
            options: &self.options,
            listener,
            stack: Vec::new(),
        }
        .run(source);

        match &result {
            Ok(()) => log::trace!("scan of {} bytes complete", source.len()),
            Err(err) => log::debug!(
                "scan failed while {} at index {} ({}:{}): {}",
                err.phase(),
                err.index(),
                err.line(),
                err.column(),
                err.message()
            ),
        }
        result
    }
}

/// A container the driver is inside of, and what it expects next.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Inside `[`, before an item or the closing `]`.
    ArrayItem { after_comma: bool },
    /// After an array item, before `,` or `]`.
    ArrayNext,
    /// Inside `{`, before a key or the closing `}`.
    ObjectKey { after_comma: bool },
    /// After a member value, before `,` or `}`.
    ObjectNext,
}

struct Driver<'a, 'o, 'l, L: ?Sized> {
    scanner: Scanner<'a>,
    options: &'o ParserOptions,
    listener: &'l mut L,
    stack: Vec<Frame>,
}

impl<L: TokenEventListener + ?Sized> Driver<'_, '_, '_, L> {
    fn run(mut self, source: CharSource<'_>) -> Result<(), ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::with_char(
                "Scanning JSON",
                "Input is larger than 4 GiB",
                &source,
                0,
                None,
            ));
        }

        let Some(ch) = self.scanner.skip_whitespace()? else {
            return Err(self.scanner.error("Scanning JSON", "No JSON value found"));
        };
        self.parse_value(ch, "Scanning JSON")?;
        while let Some(&frame) = self.stack.last() {
            self.step(frame)?;
        }

        if self.options.strict {
            self.scanner.check_for_junk()?;
        }
        Ok(())
    }

    #[inline]
    fn scalar(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.listener.start(kind, start);
        self.listener.end(kind, end);
    }

    #[inline]
    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.stack.last_mut() {
            *top = frame;
        }
    }

    /// Emits a scalar, or opens a container and leaves its contents to
    /// [`step`](Self::step).
    fn parse_value(&mut self, ch: u8, phase: &'static str) -> Result<(), ParseError> {
        let start = self.scanner.index();
        match ch {
            b'{' => self.open(TokenKind::Object, Frame::ObjectKey { after_comma: false }),
            b'[' => self.open(TokenKind::Array, Frame::ArrayItem { after_comma: false }),
            b'"' => {
                let end = self.scanner.find_end_of_encoded_string()?;
                self.scalar(TokenKind::String, start + 1, end);
                Ok(())
            }
            b'-' | b'+' | b'0'..=b'9' => {
                let (end, is_float) = self.scanner.find_end_of_number()?;
                let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
                self.scalar(kind, start, end);
                Ok(())
            }
            b't' => {
                let end = self.scanner.find_true_end()?;
                self.scalar(TokenKind::Boolean, start, end);
                Ok(())
            }
            b'f' => {
                let end = self.scanner.find_false_end()?;
                self.scalar(TokenKind::Boolean, start, end);
                Ok(())
            }
            b'n' => {
                let end = self.scanner.find_null_end()?;
                self.scalar(TokenKind::Null, start, end);
                Ok(())
            }
            _ => Err(self.scanner.error(phase, "Unexpected character")),
        }
    }

    /// The cursor is on the opening bracket.
    fn open(&mut self, kind: TokenKind, frame: Frame) -> Result<(), ParseError> {
        if self.stack.len() >= self.options.max_depth {
            return Err(self.scanner.error("Scanning JSON", "Nesting is too deep"));
        }
        self.listener.start(kind, self.scanner.index());
        self.scanner.bump();
        self.stack.push(frame);
        Ok(())
    }

    /// The cursor is on the closing bracket.
    fn close(&mut self, kind: TokenKind) {
        self.scanner.bump();
        self.listener.end(kind, self.scanner.index());
        self.stack.pop();
    }

    /// Advances the innermost container by one item, member or separator.
    ///
    /// A nested container only gets opened here; the frame is updated first
    /// so the parent resumes after it once it closes.
    fn step(&mut self, frame: Frame) -> Result<(), ParseError> {
        const ITEM: &str = "Parsing array item";
        const KEY: &str = "Parsing object key";

        match frame {
            Frame::ArrayItem { after_comma } => {
                let ch = self
                    .scanner
                    .skip_whitespace()?
                    .ok_or_else(|| self.scanner.error("Parsing array", "Unterminated array"))?;
                if ch == b']' {
                    if after_comma && self.options.strict {
                        return Err(self.scanner.error(ITEM, "Trailing comma in array"));
                    }
                    self.close(TokenKind::Array);
                } else {
                    self.set_top(Frame::ArrayNext);
                    self.parse_value(ch, ITEM)?;
                }
            }
            Frame::ArrayNext => {
                if self.scanner.find_comma_or_array_end()? {
                    self.close(TokenKind::Array);
                } else {
                    self.scanner.bump();
                    self.set_top(Frame::ArrayItem { after_comma: true });
                }
            }
            Frame::ObjectKey { after_comma } => {
                let ch = self
                    .scanner
                    .skip_whitespace()?
                    .ok_or_else(|| self.scanner.error(KEY, "Unterminated object"))?;
                if ch == b'}' {
                    if after_comma && self.options.strict {
                        return Err(self.scanner.error(KEY, "Trailing comma in object"));
                    }
                    self.close(TokenKind::Object);
                    return Ok(());
                }

                self.parse_key(ch)?;

                let ch = self
                    .scanner
                    .skip_whitespace()?
                    .ok_or_else(|| self.scanner.error("Parsing object value", "Unterminated object"))?;
                self.listener.start(TokenKind::AttributeValue, self.scanner.index());
                self.set_top(Frame::ObjectNext);
                self.parse_value(ch, "Parsing object value")?;
            }
            Frame::ObjectNext => {
                let done = self.scanner.find_comma_or_object_end()?;
                self.listener.end(TokenKind::AttributeValue, self.scanner.index());
                if done {
                    self.close(TokenKind::Object);
                } else {
                    self.scanner.bump();
                    self.set_top(Frame::ObjectKey { after_comma: true });
                }
            }
        }
        Ok(())
    }

    /// Scans a key and its `:`, leaving the cursor after the `:`.
    fn parse_key(&mut self, ch: u8) -> Result<(), ParseError> {
        const PHASE: &str = "Parsing object key";
        let key_start = self.scanner.index();

        match ch {
            b'"' => {
                self.listener.start(TokenKind::AttributeKey, key_start);
                let end = if self.options.objects_keys_can_be_encoded {
                    self.scanner.find_end_of_encoded_string()?
                } else {
                    self.scanner.find_end_of_string()?
                };
                self.scalar(TokenKind::String, key_start + 1, end);
            }
            b'a'..=b'z' | b'A'..=b'Z' if self.options.allow_unquoted_keys => {
                self.listener.start(TokenKind::AttributeKey, key_start);
                let end = self.scanner.find_attribute_end();
                self.scalar(TokenKind::String, key_start, end);
            }
            _ => return Err(self.scanner.error(PHASE, "Object key must be a string")),
        }

        if self.scanner.find_colon_or_object_end()? {
            return Err(self.scanner.error(PHASE, "Expected ':' after object key"));
        }
        self.listener.end(TokenKind::AttributeKey, self.scanner.index());
        self.scanner.bump();
        Ok(())
    }
}
