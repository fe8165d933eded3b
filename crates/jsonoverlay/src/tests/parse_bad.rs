//! Rejected documents: every input here is also refused by `serde_json`, so the
//! strict scanner must fail on it too, and point at the right byte.

use rstest::rstest;

use crate::{CharSource, Document, JsonParser, ParseError, ParserOptions};

fn strict() -> ParserOptions {
    ParserOptions {
        strict: true,
        ..ParserOptions::default()
    }
}

fn scan_err(text: &str) -> ParseError {
    JsonParser::new(strict())
        .scan(CharSource::from(text))
        .expect_err(text)
}

#[rstest]
#[case("", "No JSON value found", 0)]
#[case("{", "Unterminated object", 1)]
#[case("[1,]", "Trailing comma in array", 3)]
#[case(r#"{"a":1,}"#, "Trailing comma in object", 7)]
#[case("01", "Number can't start with a 0", 0)]
#[case("+1", "Number can't start with a plus", 0)]
#[case("1.", "After decimal point expecting number", 2)]
#[case("-", "Minus sign must be followed by a digit", 1)]
#[case(".5", "Unexpected character", 0)]
#[case("1e", "After exponent expecting number or sign", 2)]
#[case("[1 2]", "Expected ',' or ']' after array item", 3)]
#[case(r#"{"a" 1}"#, "Expected ':' after object key", 5)]
#[case("{1:2}", "Object key must be a string", 1)]
#[case(r#""\x""#, "Invalid escape character", 2)]
#[case("\"a\nb\"", "Control character in string", 2)]
#[case("tru", "Unexpected character", 3)]
#[case("nul", "Unexpected character", 3)]
#[case("[", "Unterminated array", 1)]
#[case("]", "Unexpected character", 0)]
#[case("1 2", "Unexpected extra characters", 2)]
#[case(r#"{"a":}"#, "Unexpected character", 5)]
#[case("[,1]", "Unexpected character", 1)]
#[case("{,}", "Object key must be a string", 1)]
#[case(r#""unterminated"#, "Unable to find closing for String", 13)]
fn rejected_like_serde(#[case] text: &str, #[case] message: &str, #[case] index: usize) {
    assert!(serde_json::from_str::<serde_json::Value>(text).is_err(), "{text}");

    let err = scan_err(text);
    assert_eq!(err.message(), message, "{err}");
    assert_eq!(err.index(), index, "{err}");
}

#[test]
fn comments_are_errors_unless_enabled() {
    let text = "[1, // one\n 2]";
    assert!(serde_json::from_str::<serde_json::Value>(text).is_err());
    assert_eq!(scan_err(text).message(), "Unexpected character");

    let options = ParserOptions {
        allow_slash_slash_comments: true,
        ..strict()
    };
    assert!(JsonParser::new(options).scan(CharSource::from(text)).is_ok());
}

#[test]
fn unterminated_block_comment_points_at_its_opening() {
    let options = strict().with_comments(true);
    let err = JsonParser::new(options)
        .scan(CharSource::from("[1, /* never closed"))
        .unwrap_err();
    assert_eq!((err.message(), err.index()), ("Unterminated block comment", 4));
}

#[test]
fn errors_carry_line_and_column() {
    let err = scan_err("{\n  \"a\": 1,\n  \"b\" 2\n}");
    assert_eq!(err.message(), "Expected ':' after object key");
    assert_eq!((err.line(), err.column()), (3, 7));
}

#[test]
fn nesting_past_the_limit_is_rejected() {
    let options = ParserOptions {
        max_depth: 16,
        ..strict()
    };
    let text = alloc::format!("{}{}", "[".repeat(17), "]".repeat(17));
    let err = JsonParser::new(options).scan(CharSource::from(text.as_str())).unwrap_err();
    assert_eq!(err.message(), "Nesting is too deep");
}

#[test]
fn default_limit_is_one_past_the_deepest_accepted_document() {
    let depth = ParserOptions::DEFAULT_MAX_DEPTH + 1;
    let text = alloc::format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let err = JsonParser::new(strict()).scan(CharSource::from(text.as_str())).unwrap_err();
    assert_eq!(err.message(), "Nesting is too deep");
    assert_eq!(err.phase(), "Scanning JSON");
    assert_eq!(err.index(), ParserOptions::DEFAULT_MAX_DEPTH);
}

#[test]
fn deep_objects_past_the_default_limit_are_rejected() {
    let depth = ParserOptions::DEFAULT_MAX_DEPTH;
    let text = alloc::format!("{}{{}}{}", "{\"a\":".repeat(depth), "}".repeat(depth));
    let err = JsonParser::new(strict()).scan(CharSource::from(text.as_str())).unwrap_err();
    assert_eq!(err.message(), "Nesting is too deep");
    assert_eq!(err.index(), 5 * depth);
}

#[test]
fn document_surfaces_scan_errors() {
    let err = Document::parse("[true, fals]", strict()).unwrap_err();
    assert_eq!(err.phase(), "Parsing JSON false boolean");
    assert_eq!(err.index(), 11);
}
