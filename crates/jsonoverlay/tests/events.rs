#![expect(missing_docs)]
#![expect(clippy::needless_raw_string_hashes)]

use core::fmt::Write;

use insta::assert_snapshot;
use jsonoverlay::{CharSource, JsonParser, ParserOptions, TokenEventListener, TokenKind};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes one indented line per event.
#[derive(Default)]
struct Outline {
    out: String,
    depth: usize,
}

impl TokenEventListener for Outline {
    fn start(&mut self, kind: TokenKind, index: usize) {
        writeln!(self.out, "{:indent$}+{kind:?} @{index}", "", indent = self.depth * 2).unwrap();
        self.depth += 1;
    }

    fn end(&mut self, kind: TokenKind, index: usize) {
        self.depth -= 1;
        writeln!(self.out, "{:indent$}-{kind:?} @{index}", "", indent = self.depth * 2).unwrap();
    }
}

/// Counts containers without keeping any tokens.
#[derive(Default)]
struct Census {
    objects: usize,
    arrays: usize,
    scalars: usize,
}

impl TokenEventListener for Census {
    fn start(&mut self, kind: TokenKind, _index: usize) {
        match kind {
            TokenKind::Object => self.objects += 1,
            TokenKind::Array => self.arrays += 1,
            TokenKind::AttributeKey | TokenKind::AttributeValue => {}
            _ => self.scalars += 1,
        }
    }

    fn end(&mut self, _kind: TokenKind, _index: usize) {}
}

#[test]
fn events_outline_the_document() {
    init();
    let mut outline = Outline::default();
    JsonParser::default()
        .scan_events(CharSource::from(r#"{"k":[1,{}]}"#), &mut outline)
        .unwrap();
    assert_eq!(outline.depth, 0);
    assert_snapshot!(outline.out, @r#"
    +Object @0
      +AttributeKey @1
        +String @2
        -String @3
      -AttributeKey @4
      +AttributeValue @5
        +Array @5
          +Int @6
          -Int @7
          +Object @8
          -Object @10
        -Array @11
      -AttributeValue @11
    -Object @12
    "#);
}

#[test]
fn events_without_a_token_list() {
    init();
    let text = r#"[{"a":[1,2]},{"b":{"c":null}},"s",true]"#;
    let mut census = Census::default();
    JsonParser::new(ParserOptions {
        strict: true,
        ..ParserOptions::default()
    })
    .scan_events(CharSource::from(text), &mut census)
    .unwrap();
    assert_eq!((census.objects, census.arrays, census.scalars), (3, 2, 8));
}

#[test]
fn listener_sees_the_same_spans_as_the_token_list() {
    init();
    let text = r#"{"xs":[1.5,-2],"ok":true}"#;
    let mut outline = Outline::default();
    let tokens = JsonParser::default()
        .scan_with_listener(CharSource::from(text), &mut outline)
        .unwrap();

    let starts = outline.out.lines().filter(|line| line.trim_start().starts_with('+')).count();
    assert_eq!(starts, tokens.len());
    for token in &tokens {
        let opened = format!("+{:?} @{}", token.kind, token.start);
        let closed = format!("-{:?} @{}", token.kind, token.end);
        assert!(outline.out.lines().any(|line| line.trim_start() == opened), "{opened}");
        assert!(outline.out.lines().any(|line| line.trim_start() == closed), "{closed}");
    }
}

#[test]
fn failed_scans_stop_mid_stream() {
    init();
    let mut outline = Outline::default();
    let err = JsonParser::default()
        .scan_events(CharSource::from("[1,[2,"), &mut outline)
        .unwrap_err();
    assert_eq!(err.message(), "Unterminated array");
    assert_eq!(outline.depth, 2);
}
