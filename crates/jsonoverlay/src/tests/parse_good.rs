//! Accepted documents: token layouts pinned as inline snapshots, plus a small
//! corpus that must scan cleanly in strict mode.

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use insta::assert_snapshot;
use rstest::rstest;

use crate::{CharSource, JsonParser, NodeType, ParserOptions, TokenKind};

fn strict() -> ParserOptions {
    ParserOptions {
        strict: true,
        ..ParserOptions::default()
    }
}

/// One line per token; scalars also show their raw text.
fn layout(text: &str, options: ParserOptions) -> String {
    let source = CharSource::from(text);
    let tokens = JsonParser::new(options).scan(source).unwrap();
    let mut out = String::new();
    for token in &tokens {
        if token.kind.is_container() {
            writeln!(out, "{token}").unwrap();
        } else {
            let raw = source.slice_to_str(token.start_index(), token.end_index());
            writeln!(out, "{token} {raw:?}").unwrap();
        }
    }
    out
}

#[test]
fn flat_object_layout() {
    assert_snapshot!(layout(r#"{"a":1,"b":2}"#, strict()), @r#"
    Object[0..13)
    AttributeKey[1..4)
    String[2..3) "a"
    AttributeValue[5..6)
    Int[5..6) "1"
    AttributeKey[7..10)
    String[8..9) "b"
    AttributeValue[11..12)
    Int[11..12) "2"
    "#);
}

#[test]
fn pretty_printed_layout() {
    let text = "{\n  \"xs\": [1.5, -2],\n  \"ok\": true\n}";
    assert_snapshot!(layout(text, strict()), @r#"
    Object[0..35)
    AttributeKey[4..8)
    String[5..7) "xs"
    AttributeValue[10..19)
    Array[10..19)
    Float[11..14) "1.5"
    Int[16..18) "-2"
    AttributeKey[23..27)
    String[24..26) "ok"
    AttributeValue[29..34)
    Boolean[29..33) "true"
    "#);
}

#[test]
fn lenient_layout() {
    let text = r#"{id: 7, /* c */ "s": "x\ty"}"#;
    assert_snapshot!(layout(text, ParserOptions::lenient()), @r#"
    Object[0..28)
    AttributeKey[1..3)
    String[1..3) "id"
    AttributeValue[5..6)
    Int[5..6) "7"
    AttributeKey[16..19)
    String[17..18) "s"
    AttributeValue[21..27)
    String[22..26) "x\\ty"
    "#);
}

#[rstest]
#[case("{}", NodeType::Object)]
#[case("[]", NodeType::Array)]
#[case(" [ ] ", NodeType::Array)]
#[case("[[[]]]", NodeType::Array)]
#[case(r#"{"":""}"#, NodeType::Object)]
#[case(r#"{"a":{"b":{"c":[null]}}}"#, NodeType::Object)]
#[case(r#""é\n\"\\\/""#, NodeType::String)]
#[case(r#""😀""#, NodeType::String)]
#[case("\"é日本\"", NodeType::String)]
#[case("-0", NodeType::Int)]
#[case("123456789012345678901234567890", NodeType::Int)]
#[case("0.5e-10", NodeType::Float)]
#[case("1E+2", NodeType::Float)]
#[case("\t\r\n false \n", NodeType::Boolean)]
#[case("null", NodeType::Null)]
fn accepted_in_strict_mode(#[case] text: &str, #[case] expected: NodeType) {
    assert!(serde_json::from_str::<serde_json::Value>(text).is_ok(), "{text}");

    let parser = JsonParser::new(strict());
    let source = CharSource::from(text);
    let tokens = parser.scan(source).unwrap();
    let root = parser.parse(&tokens, source).unwrap();
    assert_eq!(root.node_type(), expected);
}

#[test]
fn wrappers_pair_up() {
    let text = r#"{"a":[{"b":1},{"c":{}}],"d":"e"}"#;
    let tokens = JsonParser::new(strict()).scan(CharSource::from(text)).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
    let keys = kinds.iter().filter(|&&kind| kind == TokenKind::AttributeKey).count();
    let values = kinds.iter().filter(|&&kind| kind == TokenKind::AttributeValue).count();
    assert_eq!(keys, 4);
    assert_eq!(keys, values);
}

#[test]
fn deep_nesting_within_the_limit() {
    let depth = ParserOptions::DEFAULT_MAX_DEPTH;
    let mut text = String::new();
    text.extend(core::iter::repeat_n('[', depth));
    text.extend(core::iter::repeat_n(']', depth));

    let tokens = JsonParser::new(strict()).scan(CharSource::from(text.as_str())).unwrap();
    assert_eq!(tokens.len(), depth);
    assert_eq!(tokens[depth - 1].start_index(), depth - 1);
    assert_eq!(tokens[depth - 1].end_index(), depth + 1);
    assert_eq!(tokens[0].end_index(), 2 * depth);
}

#[test]
fn deep_objects_within_the_limit() {
    let depth = ParserOptions::DEFAULT_MAX_DEPTH;
    let mut text = "{\"a\":".repeat(depth - 1);
    text.push_str("{}");
    text.push_str(&"}".repeat(depth - 1));

    let tokens = JsonParser::new(strict()).scan(CharSource::from(text.as_str())).unwrap();
    // Every level but the innermost adds a key, its string and a value wrapper.
    assert_eq!(tokens.len(), 4 * (depth - 1) + 1);
    assert_eq!(tokens[0].end_index(), text.len());
    let innermost = tokens.last().unwrap();
    assert_eq!(innermost.kind, TokenKind::Object);
    assert_eq!(innermost.start_index(), 5 * (depth - 1));
}
