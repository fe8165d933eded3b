#![no_main]

use arbitrary::Arbitrary;
use jsonoverlay::{CharSource, JsonParser, Node, ParserOptions, child_tokens};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    flags: u8,
    text: String,
}

fn options(flags: u8) -> ParserOptions {
    ParserOptions {
        strict: flags & 1 != 0,
        objects_keys_can_be_encoded: flags & 2 != 0,
        allow_unquoted_keys: flags & 4 != 0,
        ..ParserOptions::default().with_comments(flags & 8 != 0)
    }
}

/// Touches every node so lazy conversions run.
fn walk(node: &Node<'_>) {
    match node {
        Node::Object(object) => {
            if let Ok(keys) = object.keys() {
                for key in keys {
                    if let Ok(key) = key.value() {
                        assert!(object.get(key).is_some(), "key {key:?} does not resolve");
                    }
                }
            }
            object.values().for_each(walk);
        }
        Node::Array(array) => array.iter().for_each(walk),
        Node::String(string) => {
            let _ = string.value();
        }
        Node::Number(number) => {
            let _ = number.value();
            let _ = number.as_decimal();
        }
        Node::Boolean(_) | Node::Null(_) => {}
    }
}

fn overlay(input: &Input) {
    let options = options(input.flags);
    let parser = JsonParser::new(options);
    let source = CharSource::from(input.text.as_str());

    // Whatever serde accepts, strict scanning accepts too.
    if options.strict && serde_json::from_str::<serde_json::Value>(&input.text).is_ok() {
        assert!(parser.scan(source).is_ok(), "rejected valid JSON: {:?}", input.text);
    }

    let Ok(tokens) = parser.scan(source) else {
        return;
    };
    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_container() {
            for child in child_tokens(&tokens[i..]) {
                assert!(token.contains(&child[0]), "{} escapes {token}", child[0]);
            }
        }
    }

    let root = parser.parse(&tokens, source).expect("scanner output is well formed");
    walk(root.node());
}

fuzz_target!(|input: Input| overlay(&input));
