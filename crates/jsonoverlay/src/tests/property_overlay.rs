use core::ptr;

use quickcheck::QuickCheck;
use serde_json::Value;

use super::arbitrary::Doc;
use crate::{
    CharSource, JsonParser, Node, ParserOptions, RootNode, TokenKind, child_tokens,
};

fn options() -> ParserOptions {
    ParserOptions {
        strict: true,
        objects_keys_can_be_encoded: true,
        ..ParserOptions::default()
    }
}

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

fn to_value(node: &Node<'_>) -> Value {
    match node {
        Node::Null(_) => Value::Null,
        Node::Boolean(b) => Value::Bool(b.value()),
        Node::String(s) => Value::String(s.value().unwrap().into()),
        Node::Number(n) if n.is_float() => Value::from(n.as_f64().unwrap()),
        Node::Number(n) if n.is_long() => Value::from(n.as_i64().unwrap()),
        Node::Number(n) => serde_json::from_str(&n.raw()).unwrap(),
        Node::Array(a) => Value::Array(a.iter().map(to_value).collect()),
        Node::Object(o) => Value::Object(
            o.entries()
                .map(|(k, v)| (k.value().unwrap().into(), to_value(v)))
                .collect(),
        ),
    }
}

/// Property: the overlay reads back exactly the value that was serialized.
#[test]
fn overlay_matches_serde_json() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let parser = JsonParser::new(options());
        let source = CharSource::from(doc.text.as_str());
        let tokens = parser.scan(source).unwrap();
        let root = parser.parse(&tokens, source).unwrap();
        to_value(root.node()) == doc.value
    }

    QuickCheck::new().tests(tests()).quickcheck(prop as fn(Doc) -> bool);
}

/// Property: the root node's span is the document itself; nothing is copied
/// or rewritten.
#[test]
fn root_span_round_trips() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let source = CharSource::from(doc.text.as_str());
        let tokens = JsonParser::new(options()).scan(source).unwrap();
        let root = RootNode::new(&tokens, source, options()).unwrap();
        let expected = match root.node() {
            Node::String(_) => &doc.text.as_bytes()[1..doc.text.len() - 1],
            _ => doc.text.as_bytes(),
        };
        root.node().as_bytes() == expected
    }

    QuickCheck::new().tests(tests()).quickcheck(prop as fn(Doc) -> bool);
}

/// Property: children returned by the resolver lie inside their container,
/// in order, without overlapping.
#[test]
fn children_are_nested_and_ordered() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let tokens = JsonParser::new(options())
            .scan(CharSource::from(doc.text.as_str()))
            .unwrap();

        tokens.iter().enumerate().all(|(i, container)| {
            if !container.kind.is_container() {
                return true;
            }
            let children = child_tokens(&tokens[i..]);
            let inside = children.iter().all(|child| container.contains(&child[0]));
            let ordered = children.windows(2).all(|pair| pair[1][0].start >= pair[0][0].end);
            let paired = container.kind != TokenKind::Object || children.len() % 2 == 0;
            inside && ordered && paired
        })
    }

    QuickCheck::new().tests(tests()).quickcheck(prop as fn(Doc) -> bool);
}

/// Property: asking a collection for the same child twice hands out the same
/// node instance.
#[test]
fn lookups_return_the_memoized_instance() {
    fn same_twice(node: &Node<'_>) -> bool {
        match node {
            Node::Array(array) => (0..array.len()).all(|i| {
                let (Some(a), Some(b)) = (array.get_index(i), array.get_index(i)) else {
                    return false;
                };
                ptr::eq(a, b) && same_twice(a)
            }),
            Node::Object(object) => object.keys().unwrap().iter().all(|key| {
                let key = key.value().unwrap();
                let (Some(a), Some(b)) = (object.get(key), object.get(key)) else {
                    return false;
                };
                ptr::eq(a, b) && same_twice(a)
            }),
            _ => true,
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc) -> bool {
        let source = CharSource::from(doc.text.as_str());
        let tokens = JsonParser::new(options()).scan(source).unwrap();
        let root = RootNode::new(&tokens, source, options()).unwrap();
        same_twice(root.node())
    }

    QuickCheck::new().tests(tests()).quickcheck(prop as fn(Doc) -> bool);
}
