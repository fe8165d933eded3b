use alloc::{format, string::String, string::ToString, vec::Vec};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use quickcheck::QuickCheck;
use rstest::rstest;

use super::*;

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

#[rstest]
#[case("")]
#[case("a")]
#[case("id")]
#[case("name")]
#[case("version")]
#[case("twelve_chars")]
#[case("thirteen_char")]
#[case("a_much_longer_key_than_the_unrolled_cases")]
#[case("ключ")]
fn match_chars_matches_identical_keys(#[case] key: &str) {
    let text = format!("\"{key}\"");
    let source = CharSource::from(text.as_str());
    assert!(source.match_chars(1, 1 + key.len(), key));
}

#[rstest]
#[case("name", "nbme")]
#[case("name", "namf")]
#[case("twelve_chars", "twelve_charz")]
#[case("a_much_longer_key", "b_much_longer_key")]
#[case("a_much_longer_key", "a_much_longer_kez")]
#[case("a_much_longer_key", "a_much_lXnger_key")]
#[case("a_much_longer_key", "a_Xuch_longer_key")]
#[case("short", "shorter")]
fn match_chars_rejects_differences(#[case] text: &str, #[case] key: &str) {
    let source = CharSource::from(text);
    assert!(!source.match_chars(0, text.len(), key));
}

#[test]
fn match_chars_out_of_bounds_is_false() {
    let source = CharSource::from("abc");
    assert!(!source.match_chars(1, 9, "bc"));
}

#[test]
fn window_uses_logical_offsets() {
    let data = b"xxxx{\"k\":12}yyyy";
    let source = CharSource::window(data, 4, 12).unwrap();
    assert_eq!(source.base(), 4);
    assert_eq!(source.len(), 8);
    assert_eq!(source.byte_at(0), Some(b'{'));
    assert!(source.match_chars(2, 3, "k"));
    assert_eq!(source.slice_to_i32(5, 7).unwrap(), 12);
    assert_eq!(source.byte_at(8), None);
    assert!(CharSource::window(data, 10, 40).is_none());
}

#[test]
fn char_at_decodes_utf8() {
    let source = CharSource::from("aé");
    assert_eq!(source.char_at(0), Some('a'));
    assert_eq!(source.char_at(1), Some('é'));
    assert_eq!(source.char_at(3), None);

    let invalid = CharSource::new(b"\xff");
    assert_eq!(invalid.char_at(0), Some(char::REPLACEMENT_CHARACTER));
}

#[rstest]
#[case(r"a\nb\tc", "a\nb\tc")]
#[case(r#"\"quoted\""#, "\"quoted\"")]
#[case(r"\\\/\b\f\r", "\\/\u{8}\u{c}\r")]
#[case(r"\u0041\u00e9", "Aé")]
#[case(r"\ud83d\ude00!", "😀!")]
#[case(r"tail\u0020", "tail ")]
fn decodes_escapes(#[case] raw: &str, #[case] expected: &str) {
    let source = CharSource::from(raw);
    assert!(source.has_escape(0, raw.len()));
    let decoded = source.slice_to_decoded_str(0, raw.len()).unwrap();
    assert_eq!(decoded, expected);
    assert!(matches!(decoded, Cow::Owned(_)));
}

#[rstest]
#[case(r"\x", "Invalid escape character", 1)]
#[case(r"ab\", "Unterminated escape sequence", 3)]
#[case(r"\u12G4", "Invalid hex digit in unicode escape", 4)]
#[case(r"\u12", "Unterminated unicode escape", 4)]
#[case(r"\uD800", "High surrogate is not followed by a low surrogate", 0)]
#[case(r"\uD800\u0041", "High surrogate is not followed by a low surrogate", 6)]
#[case(r"x\uDC00", "Low surrogate without a preceding high surrogate", 1)]
fn rejects_bad_escapes(#[case] raw: &str, #[case] message: &str, #[case] index: usize) {
    let source = CharSource::from(raw);
    let err = source.slice_to_decoded_str(0, raw.len()).unwrap_err();
    assert_eq!(err.message(), message);
    assert_eq!(err.index(), index);
}

#[test]
fn unescaped_strings_are_borrowed() {
    let source = CharSource::from("plain text");
    let decoded = source.slice_to_decoded_str(0, 10).unwrap();
    assert!(matches!(decoded, Cow::Borrowed("plain text")));
}

#[test]
fn fast_and_slow_decoding_agree_without_escapes() {
    fn prop(text: String) -> bool {
        if text.contains('\\') {
            return true;
        }
        let source = CharSource::from(text.as_str());
        let fast = source.slice_to_decoded_str(0, text.len()).unwrap();
        let slow = source.slice_to_decoded_string(0, text.len()).unwrap();
        fast == slow && fast == text
    }
    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(String) -> bool);
}

#[rstest]
#[case("2147483647", true, true)]
#[case("2147483648", false, true)]
#[case("-2147483648", true, true)]
#[case("-2147483649", false, true)]
#[case("9223372036854775807", false, true)]
#[case("9223372036854775808", false, false)]
#[case("-9223372036854775808", false, true)]
#[case("-9223372036854775809", false, false)]
#[case("0", true, true)]
#[case("-7", true, true)]
#[case("123456789012345678901", false, false)]
fn integer_boundaries(#[case] digits: &str, #[case] int: bool, #[case] long: bool) {
    let source = CharSource::from(digits);
    let end = digits.len();
    assert_eq!(source.is_integer(0, end), int);
    assert_eq!(source.is_long(0, end), long);
    assert_eq!(digits.parse::<i32>().is_ok(), int);
    assert_eq!(digits.parse::<i64>().is_ok(), long);
    if int {
        assert_eq!(source.slice_to_i32(0, end).unwrap(), digits.parse::<i32>().unwrap());
    }
    if long {
        assert_eq!(source.slice_to_i64(0, end).unwrap(), digits.parse::<i64>().unwrap());
    }
}

#[test]
fn representability_matches_conversion() {
    fn prop(n: i64, widen: u8) -> bool {
        // Stretch some samples past the 64-bit range.
        let digits = if widen % 4 == 0 {
            format!("{n}{}", widen % 10)
        } else {
            n.to_string()
        };
        let source = CharSource::from(digits.as_str());
        let end = digits.len();
        source.is_integer(0, end) == digits.parse::<i32>().is_ok()
            && source.is_long(0, end) == digits.parse::<i64>().is_ok()
    }
    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(i64, u8) -> bool);
}

#[test]
fn doubles_match_core_parser() {
    fn prop(value: f64) -> bool {
        if !value.is_finite() {
            return true;
        }
        [format!("{value}"), format!("{value:e}")].iter().all(|text| {
            let source = CharSource::from(text.as_str());
            let parsed = source.slice_to_f64(0, text.len()).unwrap();
            parsed.to_bits() == text.parse::<f64>().unwrap().to_bits()
        })
    }
    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(f64) -> bool);
}

#[rstest]
#[case("0.1", 0.1)]
#[case("-12.5e-3", -0.0125)]
#[case("6.02214076e23", 6.022_140_76e23)]
#[case("1E2", 100.0)]
#[case("2.5e+2", 250.0)]
#[case("1e-400", 0.0)]
fn parses_doubles(#[case] text: &str, #[case] expected: f64) {
    let source = CharSource::from(text);
    assert_eq!(source.slice_to_f64(0, text.len()).unwrap(), expected);
}

#[test]
fn floats_use_their_own_fast_path() {
    let source = CharSource::from("3.1415927");
    assert_eq!(source.slice_to_f32(0, 9).unwrap(), 3.141_592_7_f32);
    let source = CharSource::from("16777217");
    assert_eq!(source.slice_to_f32(0, 8).unwrap(), 16_777_216.0_f32);
}

#[test]
fn negative_zero_keeps_its_sign() {
    let source = CharSource::from("-0.0");
    let value = source.slice_to_f64(0, 4).unwrap();
    assert_eq!(value, 0.0);
    assert!(value.is_sign_negative());
    assert!((-value).is_sign_positive());
    assert_eq!(1.0 / value, f64::NEG_INFINITY);
    assert!(source.slice_to_f32(0, 4).unwrap().is_sign_negative());
}

#[test]
fn arbitrary_precision_conversions() {
    let text = "-123456789012345678901234567890.25";
    let source = CharSource::from(text);
    let decimal = source.slice_to_decimal(0, text.len()).unwrap();
    assert_eq!(decimal, text.parse::<BigDecimal>().unwrap());
    assert_eq!(
        source.slice_to_big_int(0, text.len()).unwrap(),
        "-123456789012345678901234567890".parse::<BigInt>().unwrap()
    );

    let small = CharSource::from("-42");
    assert_eq!(small.slice_to_big_int(0, 3).unwrap(), BigInt::from(-42));
}

#[test]
fn bad_numbers_point_at_offending_byte() {
    let source = CharSource::from("[12a]");
    let err = source.slice_to_i64(1, 4).unwrap_err();
    assert_eq!(err.index(), 3);
    assert_eq!(err.ch(), Some('a'));
    assert!(source.slice_to_f64(1, 4).is_err());
    assert!(source.slice_to_decimal(1, 4).is_err());
}

#[test]
fn line_lookup() {
    let source = CharSource::from("a\nbc\n\nd");
    let lines: Vec<(usize, usize)> = (0..source.len()).map(|i| source.line_of(i)).collect();
    assert_eq!(lines, [(1, 0), (1, 0), (2, 2), (2, 2), (2, 2), (3, 5), (4, 6)]);
    assert_eq!(source.line_text(2), "bc");
    assert_eq!(source.line_text(5), "");
}
