//! Index-overlay JSON parsing.
//!
//! Scanning walks the input once and records where every value, key and
//! container starts and ends as a flat list of [`Token`]s. Nothing is decoded
//! and no tree is built. The node layer then interprets slices of that list
//! against the original buffer on demand: containers find their children by
//! interval containment, scalars convert their own span when asked, and
//! everything that was computed once is remembered.
//!
//! ```rust
//! use jsonoverlay::{CharSource, JsonParser, ParserOptions};
//!
//! let text = r#"{"name":"overlay","tags":["fast","lazy"],"size":-0.0}"#;
//! let source = CharSource::from(text);
//! let parser = JsonParser::new(ParserOptions::default());
//! let tokens = parser.scan(source).unwrap();
//! let root = parser.parse(&tokens, source).unwrap();
//!
//! let doc = root.as_object().unwrap();
//! assert_eq!(doc.get_str("name").unwrap(), Some("overlay"));
//! assert_eq!(root.at_path("tags[1]").unwrap().raw(), "lazy");
//! assert!(doc.get_f64("size").unwrap().unwrap().is_sign_negative());
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod document;
mod error;
mod node;
mod options;
mod parser;
mod path;
mod resolver;
mod source;
mod token;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use error::{NodeError, ParseError, PathError};
pub use node::{ArrayNode, BooleanNode, Node, NodeType, NullNode, Number, NumberNode, ObjectNode, RootNode, StringNode};
pub use options::ParserOptions;
pub use parser::{JsonParser, TokenEventListener};
pub use path::{Path, PathElement, PathParser, at_path};
pub use resolver::{Children, child_tokens, children};
pub use source::CharSource;
pub use token::{Token, TokenKind, TokenList};
